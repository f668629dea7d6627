use anyhow::{bail, Result};
use chrono::NaiveDate;
use std::str::FromStr;

/// Statement layouts the importer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatementFormat {
    /// CIBC online-banking export: `Transaction Date, Description, Expense, Income`
    Cibc,
    /// Headered `date,desc,amount` CSV with signed amounts
    #[default]
    Plain,
}

impl StatementFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementFormat::Cibc => "cibc",
            StatementFormat::Plain => "plain",
        }
    }
}

impl FromStr for StatementFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cibc" => Ok(StatementFormat::Cibc),
            "plain" => Ok(StatementFormat::Plain),
            other => bail!("unknown statement format: {other} (expected cibc or plain)"),
        }
    }
}

/// Dates as banks print them: ISO first, then North American month/day.
pub(crate) fn parse_statement_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    // Some exports carry a time component ("2020-06-01 00:00:00").
    let s = s.split_whitespace().next().unwrap_or("");
    ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
