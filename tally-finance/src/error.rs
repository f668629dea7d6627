use std::path::PathBuf;
use thiserror::Error;

/// Failures of the categorization engine's persistent state.
#[derive(Debug, Error)]
pub enum TallyError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("category index {index} is out of range (have {len})")]
    OutOfRange { index: i64, len: usize },
    #[error("operator console error: {0}")]
    Console(#[from] std::io::Error),
}

impl TallyError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TallyError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        TallyError::Csv {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TallyError>;
