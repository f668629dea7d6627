//! Interactive correction loop.
//!
//! For each unresolved transaction, in order: show the category menu, the
//! transaction and the classifier's guess, then read one operator line.
//!
//! | input              | effect                                        |
//! |--------------------|-----------------------------------------------|
//! | `q` / `Q` / EOF    | stop; the rest of the batch stays unresolved  |
//! | empty              | accept the guess                              |
//! | integer            | pick that registry index (0-based)            |
//! | too-large integer  | rejected, asked again                         |
//! | anything else      | new category, appended to the registry first  |
//!
//! Every resolution is fed back into the classifier before the next
//! transaction is shown.

use std::io::{BufRead, Write};

use colored::Colorize;
use tally_core::{features, OnlineClassifier, Transaction};

use crate::error::{Result, TallyError};
use crate::registry::CategoryRegistry;

const CLEAR_SCREEN: &str = "\x1b[2J";

/// One parsed operator line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Quit,
    Accept,
    Select(i64),
    /// All digits, but too large to be any index
    BadIndex(String),
    NewCategory(String),
}

impl Response {
    /// Interpret a line of operator input. Surrounding whitespace is
    /// ignored.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            Response::Quit
        } else if line.is_empty() {
            Response::Accept
        } else if is_integer(line) {
            match line.parse::<i64>() {
                Ok(n) => Response::Select(n),
                Err(_) => Response::BadIndex(line.to_string()),
            }
        } else {
            Response::NewCategory(line.to_string())
        }
    }
}

/// Optional sign followed by at least one ASCII digit
fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Clear the terminal before each transaction
    pub clear_screen: bool,
    /// Highlight the guess in color
    pub color: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            clear_screen: true,
            color: true,
        }
    }
}

/// What a session hands back to its caller.
///
/// A failure part-way through (the category file cannot be written, the
/// console goes away) stops the pass like a quit does, and the error rides
/// along with whatever was resolved before it.
#[derive(Debug, Default)]
pub struct SessionOutcome {
    /// Transactions with a final category, in resolution order
    pub resolved: Vec<Transaction>,
    /// Transactions left untouched after a quit or failure
    pub unresolved: Vec<Transaction>,
    /// True if the pass stopped before the batch was exhausted
    pub aborted: bool,
    /// The failure that stopped the pass, if any
    pub error: Option<TallyError>,
}

impl SessionOutcome {
    /// Hand back the failure, if there was one.
    pub fn into_result(self) -> Result<Self> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self),
        }
    }
}

enum Decision {
    Quit,
    Final(String),
}

/// Drives one pass over a batch. Owns the registry and classifier for the
/// duration of the pass.
pub struct Session<'a, R, W> {
    registry: &'a mut CategoryRegistry,
    classifier: &'a mut OnlineClassifier,
    input: R,
    output: W,
    options: SessionOptions,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(
        registry: &'a mut CategoryRegistry,
        classifier: &'a mut OnlineClassifier,
        input: R,
        output: W,
    ) -> Self {
        Self {
            registry,
            classifier,
            input,
            output,
            options: SessionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve `batch` in order until it is exhausted, the operator quits,
    /// or persisting a new category fails.
    pub fn run(mut self, batch: Vec<Transaction>) -> SessionOutcome {
        let mut outcome = SessionOutcome::default();
        let mut pending = batch.into_iter();

        while let Some(txn) = pending.next() {
            let features = features::extract(&txn.description);
            let guess = self.classifier.predict(&features, self.registry.as_slice());

            let decision = self
                .present(&txn, guess.as_deref())
                .and_then(|_| self.await_decision(guess));

            let category = match decision {
                Ok(Decision::Final(category)) => category,
                stopped => {
                    if let Err(e) = stopped {
                        tracing::error!(error = %e, "session stopped");
                        outcome.error = Some(e);
                    }
                    outcome.unresolved.push(txn);
                    outcome.unresolved.extend(pending);
                    outcome.aborted = true;
                    break;
                }
            };

            if !category.is_empty() {
                self.classifier.update(&features, &category);
            }
            tracing::debug!(description = %txn.description, category = %category, "resolved");
            outcome.resolved.push(txn.with_category(category));
        }

        tracing::info!(
            resolved = outcome.resolved.len(),
            unresolved = outcome.unresolved.len(),
            aborted = outcome.aborted,
            "session finished"
        );
        outcome
    }

    fn present(&mut self, txn: &Transaction, guess: Option<&str>) -> Result<()> {
        let out = &mut self.output;
        if self.options.clear_screen {
            writeln!(out, "{CLEAR_SCREEN}")?;
        }

        let width = self.registry.len().saturating_sub(1).to_string().len();
        for (i, name) in self.registry.iter() {
            writeln!(out, "{i:>width$}  {name}")?;
        }
        writeln!(out, "\n")?;

        writeln!(out, "On: {}\t {:.2}", txn.date, txn.amount)?;
        writeln!(out, "{}", txn.description)?;

        let line = format!("My guess is: {}", guess.unwrap_or("Unknown"));
        if self.options.color {
            writeln!(out, "{}", line.red().bold())?;
        } else {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    fn await_decision(&mut self, guess: Option<String>) -> Result<Decision> {
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                tracing::info!("operator input closed, stopping");
                return Ok(Decision::Quit);
            }

            match Response::parse(&line) {
                Response::Quit => return Ok(Decision::Quit),
                Response::Accept => {
                    return Ok(match guess {
                        Some(g) => Decision::Final(g),
                        None => {
                            tracing::warn!("accepted an Unknown guess; leaving category empty");
                            writeln!(self.output, "No guess to accept: recorded without a category.")?;
                            Decision::Final(String::new())
                        }
                    });
                }
                Response::Select(n) => match self.registry.index_of(n) {
                    Ok(category) => return Ok(Decision::Final(category.to_string())),
                    Err(TallyError::OutOfRange { index, len }) => {
                        writeln!(
                            self.output,
                            "No category number {index}; pick 0-{} or type a new name.",
                            len.saturating_sub(1)
                        )?;
                    }
                    Err(e) => return Err(e),
                },
                Response::BadIndex(text) => {
                    writeln!(
                        self.output,
                        "No category number {text}; pick 0-{} or type a new name.",
                        self.registry.len().saturating_sub(1)
                    )?;
                }
                Response::NewCategory(name) => {
                    self.registry.append(&name)?;
                    return Ok(Decision::Final(name));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quit() {
        assert_eq!(Response::parse("q\n"), Response::Quit);
        assert_eq!(Response::parse("Q"), Response::Quit);
    }

    #[test]
    fn test_parse_accept() {
        assert_eq!(Response::parse("\n"), Response::Accept);
        assert_eq!(Response::parse("   \r\n"), Response::Accept);
    }

    #[test]
    fn test_parse_select() {
        assert_eq!(Response::parse("3\n"), Response::Select(3));
        assert_eq!(Response::parse(" 12 "), Response::Select(12));
        assert_eq!(Response::parse("-1"), Response::Select(-1));
        assert_eq!(Response::parse("+2"), Response::Select(2));
    }

    #[test]
    fn test_parse_oversized_integer_is_not_a_category() {
        assert_eq!(
            Response::parse("99999999999999999999\n"),
            Response::BadIndex("99999999999999999999".to_string())
        );
        assert_eq!(
            Response::parse("-99999999999999999999"),
            Response::BadIndex("-99999999999999999999".to_string())
        );
    }

    #[test]
    fn test_parse_new_category() {
        assert_eq!(
            Response::parse("Eating Out\n"),
            Response::NewCategory("Eating Out".to_string())
        );
        assert_eq!(Response::parse("qq"), Response::NewCategory("qq".to_string()));
        assert_eq!(Response::parse("3a"), Response::NewCategory("3a".to_string()));
        assert_eq!(Response::parse("-"), Response::NewCategory("-".to_string()));
    }
}
