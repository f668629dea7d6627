//! Ledger file: CSV with columns `date,desc,amount,cat`.
//!
//! The whole ledger is rewritten on every save. Writes go to a sibling
//! `.tmp` file which is synced and then renamed over the ledger, so a
//! failed save leaves the previous snapshot untouched.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tally_core::{Ledger, Transaction};

use crate::error::{Result, TallyError};

const LEDGER_HEADER: [&str; 4] = ["date", "desc", "amount", "cat"];
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the ledger; a missing file is an empty ledger.
    pub fn load(&self) -> Result<Ledger> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "no ledger yet, starting empty");
            return Ok(Ledger::new());
        }

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| TallyError::csv(&self.path, e))?;

        let rows = rdr
            .deserialize::<Transaction>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| TallyError::csv(&self.path, e))?;

        tracing::info!(path = %self.path.display(), rows = rows.len(), "ledger loaded");
        Ok(Ledger::from_rows(rows))
    }

    /// Concatenate a resolved batch onto the existing ledger. No key
    /// matching: the same transaction imported twice appears twice.
    pub fn merge(existing: Ledger, resolved: impl IntoIterator<Item = Transaction>) -> Ledger {
        existing.merge(resolved)
    }

    /// Replace the ledger file with `ledger`.
    pub fn persist(&self, ledger: &Ledger) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| TallyError::io(dir, e))?;
        }

        let tmp = self.tmp_path();
        if let Err(e) = self.write_snapshot(&tmp, ledger) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        fs::rename(&tmp, &self.path).map_err(|e| TallyError::io(&self.path, e))?;

        tracing::info!(path = %self.path.display(), rows = ledger.len(), "ledger saved");
        Ok(())
    }

    fn write_snapshot(&self, tmp: &Path, ledger: &Ledger) -> Result<()> {
        let file = File::create(tmp).map_err(|e| TallyError::io(tmp, e))?;
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);

        wtr.write_record(LEDGER_HEADER)
            .map_err(|e| TallyError::csv(tmp, e))?;
        for row in ledger.rows() {
            wtr.serialize(row).map_err(|e| TallyError::csv(tmp, e))?;
        }

        let mut file = wtr
            .into_inner()
            .map_err(|e| TallyError::io(tmp, e.into_error()))?;
        file.flush()
            .and_then(|_| file.sync_all())
            .map_err(|e| TallyError::io(tmp, e))
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(TMP_SUFFIX);
        self.path.with_file_name(name)
    }
}
