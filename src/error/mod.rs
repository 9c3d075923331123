use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },
    #[error("could not read input file")]
    FileError(#[from] std::io::Error),
    #[error("could not parse CSV rows to holdings")]
    CsvError(#[from] csv::Error),
    #[error("statement header is missing columns: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },
    #[error("statement line {line}")]
    MalformedRow {
        line: u64,
        #[source]
        source: crate::domain::error::Error,
    },
    #[error(transparent)]
    BusinessError(#[from] crate::domain::error::Error),
}

impl Error {
    /// Maps a missing file to [`Error::FileNotFound`] so the path ends up in
    /// the message, anything else stays an I/O error.
    pub fn open(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Error::FileNotFound { path: path.into() },
            _ => Error::FileError(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
