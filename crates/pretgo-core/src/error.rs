use thiserror::Error;

use crate::lookup::LookupError;

/// All errors that can occur in pretgo-core.
#[derive(Debug, Error)]
pub enum PretgoError {
    #[error("Database not found: {0}")]
    DatabaseNotFound(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Autocomplete session closed")]
    SessionClosed,

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Exit codes used by the `pretgo` binary.
#[repr(i32)]
pub enum ExitCode {
    InvalidArgs = 3,
    NetworkError = 6,
    Cancelled = 8,
}

pub type Result<T> = std::result::Result<T, PretgoError>;
