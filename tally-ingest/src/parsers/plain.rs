//! Headered `date,desc,amount` CSV, the simplest hand-off from another tool.
//!
//! A `cat` column, if present, is ignored: imported rows always start
//! unresolved.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tally_core::Transaction;

use crate::types::parse_statement_date;

#[derive(Debug, Deserialize)]
struct PlainRow {
    date: String,
    desc: String,
    amount: f64,
}

pub fn parse_plain_csv(path: impl AsRef<Path>) -> Result<Vec<Transaction>> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Fields)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut out = Vec::new();
    for (line, result) in rdr.deserialize::<PlainRow>().enumerate() {
        let row = result.with_context(|| format!("reading {} row {}", path.display(), line + 2))?;
        match parse_statement_date(&row.date) {
            Some(date) => out.push(Transaction::new(date, row.desc, row.amount)),
            None => {
                tracing::warn!(row = line + 2, date = %row.date, "skipping row with unparseable date");
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_plain_ignores_existing_category() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(
            b"date,desc,amount,cat\n\
              2021-01-04,SHELL GAS 0042,-38.10,Gas\n\
              2021-01-05,E-TRANSFER FROM MOM,50,\n",
        )
        .unwrap();

        let txns = parse_plain_csv(f.path()).unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].amount, -38.10);
        assert!(txns.iter().all(|t| t.category.is_none()));
    }

    #[test]
    fn test_bad_amount_is_an_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"date,desc,amount\n2021-01-04,SHELL,lots\n").unwrap();
        assert!(parse_plain_csv(f.path()).is_err());
    }
}
