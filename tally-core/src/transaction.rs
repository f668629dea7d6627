//! Transaction records as they flow from statement import to the ledger

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One bank transaction, optionally carrying its resolved category.
///
/// Field names on the wire match the ledger file columns
/// (`date, desc, amount, cat`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Posting date (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Free-text description as printed by the bank
    #[serde(rename = "desc")]
    pub description: String,
    /// Positive = inflow, negative = outflow
    pub amount: f64,
    /// Resolved category; `None` until the operator settles it
    #[serde(rename = "cat", default)]
    pub category: Option<String>,
}

impl Transaction {
    /// Create an unresolved transaction
    pub fn new(date: NaiveDate, description: impl Into<String>, amount: f64) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            category: None,
        }
    }

    /// Builder-style helper for already classified rows
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// The category, if it is set and non-empty.
    ///
    /// Rows whose operator accepted an Unknown guess carry an empty label;
    /// those never count as labeled.
    pub fn label(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    pub fn is_outflow(&self) -> bool {
        self.amount < 0.0
    }

    /// Magnitude used by reports, which show outflows as positive numbers
    pub fn abs_amount(&self) -> f64 {
        self.amount.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, 14).unwrap()
    }

    #[test]
    fn test_new_is_unresolved() {
        let txn = Transaction::new(date(), "TIM HORTONS #123", -4.50);
        assert_eq!(txn.category, None);
        assert_eq!(txn.label(), None);
        assert!(txn.is_outflow());
        assert_eq!(txn.abs_amount(), 4.50);
    }

    #[test]
    fn test_empty_category_is_not_a_label() {
        let txn = Transaction::new(date(), "X", 1.0).with_category("");
        assert_eq!(txn.category.as_deref(), Some(""));
        assert_eq!(txn.label(), None);
        assert!(!txn.is_outflow());
    }

    #[test]
    fn test_serializes_with_ledger_column_names() {
        let txn = Transaction::new(date(), "PAYROLL", 1200.0).with_category("Income");
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["date"], "2021-03-14");
        assert_eq!(json["desc"], "PAYROLL");
        assert_eq!(json["cat"], "Income");
    }
}
