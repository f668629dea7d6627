//! In-memory ledger of classified transactions

use crate::classifier::TrainingExample;
use crate::features::extract;
use crate::transaction::Transaction;

/// Every transaction ever classified, oldest first.
///
/// The ledger only grows. Merging does not deduplicate: feeding the same
/// statement twice yields two copies of each row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    rows: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Transaction>) -> Self {
        Self { rows }
    }

    /// Concatenate a resolved batch onto an existing ledger.
    pub fn merge(mut self, batch: impl IntoIterator<Item = Transaction>) -> Self {
        self.rows.extend(batch);
        self
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Training corpus: one example per row with a non-empty category,
    /// in ledger order.
    pub fn training_examples(&self) -> impl Iterator<Item = TrainingExample> + '_ {
        self.rows.iter().filter_map(|row| {
            row.label()
                .map(|cat| TrainingExample::new(extract(&row.description), cat))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(desc: &str, cat: Option<&str>) -> Transaction {
        let d = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let t = Transaction::new(d, desc, -1.0);
        match cat {
            Some(c) => t.with_category(c),
            None => t,
        }
    }

    #[test]
    fn test_merge_appends_without_dedup() {
        let ledger = Ledger::from_rows(vec![txn("A", Some("X"))]);
        let merged = ledger.merge(vec![txn("A", Some("X")), txn("B", Some("Y"))]);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.rows()[0], merged.rows()[1]);
    }

    #[test]
    fn test_training_examples_skip_unlabeled_rows() {
        let ledger = Ledger::from_rows(vec![
            txn("TIM HORTONS", Some("Coffee")),
            txn("MYSTERY", Some("")),
            txn("LOBLAWS", None),
            txn("SHELL", Some("Gas")),
        ]);
        let corpus: Vec<_> = ledger.training_examples().collect();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus[0].category, "Coffee");
        assert!(corpus[0].features.contains_key("HORTONS"));
        assert_eq!(corpus[1].category, "Gas");
    }
}
