//! Sources of person candidates.

pub mod http;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::AppConfig;
use crate::error::{PretgoError, Result};
use crate::models::{Candidate, Query};

pub use http::HttpLookup;
pub use sqlite::SqliteLookup;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("lookup endpoint {url} answered HTTP {status}")]
    Status { status: u16, url: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Resolves a query into candidates. An empty result is not an error.
#[async_trait]
pub trait Lookup: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, query: &Query) -> std::result::Result<Vec<Candidate>, LookupError>;
}

/// Builds the source selected by `[lookup] source`.
pub fn from_config(config: &AppConfig) -> Result<Arc<dyn Lookup>> {
    match config.lookup.source.as_str() {
        "http" => Ok(Arc::new(HttpLookup::from_config(config)?)),
        "sqlite" => Ok(Arc::new(SqliteLookup::open(&config.database_path())?)),
        other => Err(PretgoError::ConfigError(format!(
            "unknown lookup source '{other}'"
        ))),
    }
}
