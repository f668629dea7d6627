//! CIBC online-banking CSV export
//!
//! Header row:
//!   Transaction Date,Description,Expense,Income
//!
//! Exactly one of Expense/Income is filled per row. The signed amount is
//! income minus expense, so spending comes out negative.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tally_core::Transaction;

use crate::types::parse_statement_date;

#[derive(Debug, Deserialize)]
struct CibcRow {
    #[serde(rename = "Transaction Date")]
    date: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Expense", default)]
    expense: Option<f64>,
    #[serde(rename = "Income", default)]
    income: Option<f64>,
}

pub fn parse_cibc_csv(path: impl AsRef<Path>) -> Result<Vec<Transaction>> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut out = Vec::new();
    for (line, result) in rdr.deserialize::<CibcRow>().enumerate() {
        let row = result.with_context(|| format!("reading {} row {}", path.display(), line + 2))?;

        let Some(date) = parse_statement_date(&row.date) else {
            tracing::warn!(row = line + 2, date = %row.date, "skipping row with unparseable date");
            continue;
        };

        let amount = row.income.unwrap_or(0.0) - row.expense.unwrap_or(0.0);
        out.push(Transaction::new(date, row.description, amount));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    fn write_csv(body: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_parses_expense_and_income_rows() {
        let f = write_csv(
            "Transaction Date,Description,Expense,Income\n\
             2020-06-03,TIM HORTONS #123,4.50,\n\
             2020-06-15,PAYROLL DEPOSIT ACME,,1500.00\n",
        );

        let txns = parse_cibc_csv(f.path()).unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].date, NaiveDate::from_ymd_opt(2020, 6, 3).unwrap());
        assert_eq!(txns[0].description, "TIM HORTONS #123");
        assert_eq!(txns[0].amount, -4.50);
        assert_eq!(txns[0].category, None);
        assert_eq!(txns[1].amount, 1500.00);
    }

    #[test]
    fn test_skips_bad_dates() {
        let f = write_csv(
            "Transaction Date,Description,Expense,Income\n\
             pending,LOBLAWS,20.00,\n\
             06/20/2020,LOBLAWS,20.00,\n",
        );
        let txns = parse_cibc_csv(f.path()).unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].date, NaiveDate::from_ymd_opt(2020, 6, 20).unwrap());
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let err = parse_cibc_csv("/nonexistent/cibc.csv").unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/cibc.csv"));
    }
}
