#![forbid(unsafe_code)]

use rusqlite::ErrorCode;

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
    Corrupt(&'static str),
    InvalidInput(&'static str),
    InvalidPattern { pattern: String, detail: String },
    UnknownProject,
}

impl StoreError {
    /// Stable machine-readable code for callers that branch on failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "UNAVAILABLE",
            Self::Sql(_) if self.is_busy() => "BUSY",
            Self::Sql(_) => "UNAVAILABLE",
            Self::Corrupt(_) => "CORRUPT",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidPattern { .. } => "INVALID_PATTERN",
            Self::UnknownProject => "UNKNOWN_PROJECT",
        }
    }

    /// Transient lock contention: another writer holds the database.
    /// Callers retry these a bounded number of times; every other error
    /// propagates immediately.
    pub fn is_busy(&self) -> bool {
        match self {
            Self::Sql(rusqlite::Error::SqliteFailure(code, _)) => matches!(
                code.code,
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::Corrupt(message) => write!(f, "corrupt store: {message}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::InvalidPattern { pattern, detail } => {
                write!(f, "invalid keep pattern {pattern:?}: {detail}")
            }
            Self::UnknownProject => write!(f, "unknown project"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}
