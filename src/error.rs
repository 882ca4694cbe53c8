//! Error types for route lookups and inserts.
//!
//! Two families exist: bad user input (dates, numbers, menu choices) and
//! storage failures raised by SQLite. Neither is recovered from inside the
//! library; they bubble up to the binary, which reports them and exits.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("invalid date '{0}', expected DD.MM.YYYY")]
    InvalidDate(String),
    #[error("invalid {field} '{value}', expected a non-negative number")]
    InvalidNumber { field: &'static str, value: String },
    #[error("invalid operation '{0}'")]
    InvalidChoice(String),
    #[error("unexpected end of input while reading {0}")]
    UnexpectedEof(&'static str),
    #[error("{context}")]
    Storage {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RouteError>;

/// Attaches a short description of the failed storage step to a rusqlite error.
pub trait StorageContext<T> {
    fn storage(self, context: &'static str) -> Result<T>;
}

impl<T> StorageContext<T> for std::result::Result<T, rusqlite::Error> {
    fn storage(self, context: &'static str) -> Result<T> {
        self.map_err(|source| RouteError::Storage { context, source })
    }
}
