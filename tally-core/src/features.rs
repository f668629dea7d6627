//! Bag-of-presence features extracted from transaction descriptions.
//!
//! Extraction is deliberately literal: anything that is not an uppercase
//! ASCII letter or a space is dropped before tokenizing, so `"walmart"`
//! contributes nothing while `"WALMART"` yields one token. Callers that want
//! case-insensitive matching must upper-case before calling [`extract`].

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static NON_FEATURE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Z ]").expect("static pattern"));

static TOKEN_DELIMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s/]").expect("static pattern"));

/// Token -> presence flag. Values are always `true`; the map form is what
/// the classifier consumes.
pub type FeatureSet = BTreeMap<String, bool>;

/// Remove every character outside `[A-Z ]`.
pub fn strip(description: &str) -> String {
    NON_FEATURE_CHARS.replace_all(description, "").into_owned()
}

/// Split on whitespace and `/`, dropping the empty pieces adjacent
/// delimiters produce.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    TOKEN_DELIMS.split(text).filter(|t| !t.is_empty())
}

/// Feature set of a description. Pure: same input, same output.
pub fn extract(description: &str) -> FeatureSet {
    let stripped = strip(description);
    tokenize(&stripped)
        .map(|token| (token.to_string(), true))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(fs: &FeatureSet) -> Vec<&str> {
        fs.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_amazon_reference_strips_to_one_token() {
        assert_eq!(strip("AMAZON.COM*A1B2C3 12/04"), "AMAZONCOMABC ");
        let fs = extract("AMAZON.COM*A1B2C3 12/04");
        assert_eq!(keys(&fs), vec!["AMAZONCOMABC"]);
        assert_eq!(fs.get("AMAZONCOMABC"), Some(&true));
    }

    #[test]
    fn test_tim_hortons() {
        let fs = extract("TIM HORTONS #123");
        assert_eq!(keys(&fs), vec!["HORTONS", "TIM"]);
    }

    #[test]
    fn test_lowercase_is_dropped() {
        assert!(extract("walmart").is_empty());
        assert_eq!(keys(&extract("Walmart")), vec!["W"]);
    }

    #[test]
    fn test_empty_description() {
        assert!(extract("").is_empty());
        assert!(extract("  12/04 ").is_empty());
    }

    #[test]
    fn test_tokenize_splits_on_slash_and_collapses_empties() {
        let tokens: Vec<_> = tokenize("PAY//PAL  TRANSFER/").collect();
        assert_eq!(tokens, vec!["PAY", "PAL", "TRANSFER"]);
    }

    #[test]
    fn test_duplicate_tokens_are_a_set() {
        let fs = extract("UBER UBER EATS");
        assert_eq!(keys(&fs), vec!["EATS", "UBER"]);
    }

    #[test]
    fn test_extract_is_pure() {
        let d = "E-TRANSFER / SEND MONEY 5512";
        let first = extract(d);
        for _ in 0..5 {
            assert_eq!(extract(d), first);
        }
    }
}
