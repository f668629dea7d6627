//! tally-ingest: reads bank statement exports into unresolved transactions.

pub mod parsers;
pub mod types;

pub use types::StatementFormat;

use anyhow::Result;
use std::path::Path;
use tally_core::Transaction;

/// Read a statement file in the given layout.
pub fn read_statement(path: impl AsRef<Path>, format: StatementFormat) -> Result<Vec<Transaction>> {
    let path = path.as_ref();
    let txns = match format {
        StatementFormat::Cibc => parsers::parse_cibc_csv(path)?,
        StatementFormat::Plain => parsers::parse_plain_csv(path)?,
    };
    tracing::info!(
        path = %path.display(),
        format = format.as_str(),
        count = txns.len(),
        "statement loaded"
    );
    Ok(txns)
}
