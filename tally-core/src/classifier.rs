//! Online Naive Bayes over presence features.
//!
//! The model is a running frequency table: for every category, how many
//! training examples carried it, how many tokens those examples had in
//! total, and per-token occurrence counts. `update` touches only the rows
//! for the tokens of one example, so the classifier can be refreshed after
//! every operator decision.
//!
//! Scoring for category `c` and feature set `F`:
//!
//! ```text
//! log P(c) + sum over t in F that are in the vocabulary of
//!     log((count(t, c) + 1) / (token_total(c) + |vocabulary|))
//! ```

use std::collections::{HashMap, HashSet};

use crate::features::FeatureSet;

/// Below this many examples `predict` refuses to guess.
pub const MIN_CORPUS_FOR_GUESS: usize = 2;

/// One labeled example
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    pub features: FeatureSet,
    pub category: String,
}

impl TrainingExample {
    pub fn new(features: FeatureSet, category: impl Into<String>) -> Self {
        Self {
            features,
            category: category.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct CategoryStats {
    name: String,
    examples: usize,
    token_total: usize,
    token_counts: HashMap<String, usize>,
}

impl CategoryStats {
    fn log_posterior(&self, features: &FeatureSet, corpus: usize, vocab: &HashSet<String>) -> f64 {
        let denom = (self.token_total + vocab.len()) as f64;
        let prior = (self.examples as f64 / corpus as f64).ln();

        features
            .keys()
            .filter(|t| vocab.contains(t.as_str()))
            .map(|t| {
                let count = self.token_counts.get(t).copied().unwrap_or(0);
                ((count + 1) as f64 / denom).ln()
            })
            .fold(prior, |acc, x| acc + x)
    }
}

/// Incrementally trainable text classifier
#[derive(Debug, Clone, Default)]
pub struct OnlineClassifier {
    corpus_len: usize,
    /// In first-seen order
    categories: Vec<CategoryStats>,
    by_name: HashMap<String, usize>,
    vocabulary: HashSet<String>,
}

impl OnlineClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build statistics from a whole corpus in one pass.
    pub fn from_corpus<I>(corpus: I) -> Self
    where
        I: IntoIterator<Item = TrainingExample>,
    {
        let mut clf = Self::new();
        for example in corpus {
            clf.update(&example.features, &example.category);
        }
        tracing::debug!(
            examples = clf.corpus_len,
            categories = clf.categories.len(),
            vocabulary = clf.vocabulary.len(),
            "classifier initialized"
        );
        clf
    }

    /// Fold one labeled example into the statistics.
    pub fn update(&mut self, features: &FeatureSet, category: &str) {
        let idx = match self.by_name.get(category) {
            Some(&i) => i,
            None => {
                self.categories.push(CategoryStats {
                    name: category.to_string(),
                    ..Default::default()
                });
                let i = self.categories.len() - 1;
                self.by_name.insert(category.to_string(), i);
                i
            }
        };

        let stats = &mut self.categories[idx];
        stats.examples += 1;
        for token in features.keys() {
            stats.token_total += 1;
            *stats.token_counts.entry(token.clone()).or_insert(0) += 1;
            if !self.vocabulary.contains(token) {
                self.vocabulary.insert(token.clone());
            }
        }
        self.corpus_len += 1;
    }

    /// Most probable category, or `None` while the corpus holds fewer than
    /// [`MIN_CORPUS_FOR_GUESS`] examples.
    ///
    /// Equal scores go to the category listed earliest in `precedence`
    /// (the registry order); categories missing from it rank after every
    /// listed one, in first-seen order.
    pub fn predict(&self, features: &FeatureSet, precedence: &[String]) -> Option<String> {
        if self.corpus_len < MIN_CORPUS_FOR_GUESS {
            return None;
        }

        let mut best: Option<(Rank, f64, &str)> = None;
        for (seen, stats) in self.categories.iter().enumerate() {
            let rank = Rank::of(&stats.name, seen, precedence);
            let score = stats.log_posterior(features, self.corpus_len, &self.vocabulary);
            let better = match &best {
                None => true,
                Some((best_rank, best_score, _)) => {
                    score > *best_score || (score == *best_score && rank < *best_rank)
                }
            };
            if better {
                best = Some((rank, score, &stats.name));
            }
        }

        let guess = best.map(|(_, _, name)| name.to_string());
        tracing::debug!(?guess, tokens = features.len(), "prediction");
        guess
    }

    /// Log posterior of every known category, in first-seen order.
    pub fn scores(&self, features: &FeatureSet) -> Vec<(String, f64)> {
        if self.corpus_len == 0 {
            return Vec::new();
        }
        self.categories
            .iter()
            .map(|s| {
                (
                    s.name.clone(),
                    s.log_posterior(features, self.corpus_len, &self.vocabulary),
                )
            })
            .collect()
    }

    /// Number of training examples seen so far
    pub fn len(&self) -> usize {
        self.corpus_len
    }

    pub fn is_empty(&self) -> bool {
        self.corpus_len == 0
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Known categories in the order they were first trained
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|s| s.name.as_str())
    }
}

/// Tie-break key: registry position first, then first-seen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Listed(usize),
    Unlisted(usize),
}

impl Rank {
    fn of(name: &str, seen: usize, precedence: &[String]) -> Self {
        match precedence.iter().position(|p| p == name) {
            Some(pos) => Rank::Listed(pos),
            None => Rank::Unlisted(seen),
        }
    }
}
