//! Append-only category list backed by a plain text file.
//!
//! One category per line, UTF-8, no header. Line order (0-based) is the
//! number the operator types to pick a category, so entries are never
//! reordered or removed.

use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, TallyError};

#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    path: PathBuf,
    entries: Vec<String>,
}

impl CategoryRegistry {
    /// Read the category file. A missing file is an empty registry; it is
    /// created on the first [`append`](Self::append).
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(s) => s
                .lines()
                .map(str::trim_end)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(TallyError::io(&path, e)),
        };
        tracing::info!(path = %path.display(), count = entries.len(), "categories loaded");
        Ok(Self { path, entries })
    }

    /// Add a category at the end and sync it to disk before returning.
    ///
    /// Duplicates are kept: appending an existing name gives it a second
    /// index.
    pub fn append(&mut self, category: &str) -> Result<usize> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| TallyError::io(dir, e))?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| TallyError::io(&self.path, e))?;

        let mut line = String::new();
        if needs_leading_newline(&mut file).map_err(|e| TallyError::io(&self.path, e))? {
            line.push('\n');
        }
        line.push_str(category);
        line.push('\n');

        file.write_all(line.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| TallyError::io(&self.path, e))?;

        self.entries.push(category.to_string());
        let index = self.entries.len() - 1;
        tracing::info!(category, index, "category added");
        Ok(index)
    }

    /// Category at 0-based position `n`.
    pub fn index_of(&self, n: i64) -> Result<&str> {
        usize::try_from(n)
            .ok()
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
            .ok_or(TallyError::OutOfRange {
                index: n,
                len: self.entries.len(),
            })
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries.iter().map(String::as_str).enumerate()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// True when the file is non-empty and its last byte is not a newline
/// (a hand-edited file saved without one).
fn needs_leading_newline(file: &mut fs::File) -> std::io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}
