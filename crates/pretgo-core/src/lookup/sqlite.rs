use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use super::{Lookup, LookupError};
use crate::error::{PretgoError, Result};
use crate::models::{Candidate, Query};
use crate::storage::{ConnectionPool, PeopleQuery};

/// Searches the loan application's database file directly.
pub struct SqliteLookup {
    pool: Arc<ConnectionPool>,
}

impl SqliteLookup {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::with_pool(ConnectionPool::open(path)?))
    }

    pub fn with_pool(pool: ConnectionPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Blocking search, usable outside a runtime.
    pub fn search_blocking(&self, text: &str) -> std::result::Result<Vec<Candidate>, LookupError> {
        let conn = self.pool.get_connection();
        PeopleQuery::new(&conn).search(text).map_err(|e| match e {
            PretgoError::Database(db) => LookupError::Database(db),
            other => LookupError::Unavailable(other.to_string()),
        })
    }
}

#[async_trait]
impl Lookup for SqliteLookup {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn search(&self, query: &Query) -> std::result::Result<Vec<Candidate>, LookupError> {
        let this = Self {
            pool: Arc::clone(&self.pool),
        };
        let text = query.as_str().to_string();
        tokio::task::spawn_blocking(move || this.search_blocking(&text))
            .await
            .map_err(|e| LookupError::Unavailable(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::people::fixtures;

    fn lookup() -> SqliteLookup {
        let pool = ConnectionPool::open_in_memory().unwrap();
        fixtures::seed(&pool.get_connection());
        SqliteLookup::with_pool(pool)
    }

    #[tokio::test]
    async fn test_search_through_trait() {
        let found = lookup().search(&Query::parse(" Dupont ")).await.unwrap();
        let ids: Vec<&str> = found.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["42", "43"]);
        assert_eq!(found[0].categorie_label.as_deref(), Some("Élève"));
    }

    #[tokio::test]
    async fn test_no_match_is_empty() {
        let found = lookup().search(&Query::parse("Zorglub")).await.unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_missing_table_maps_to_database_error() {
        let lookup = SqliteLookup::with_pool(ConnectionPool::open_in_memory().unwrap());
        let err = lookup.search_blocking("Du").unwrap_err();
        assert!(matches!(err, LookupError::Database(_)));
    }
}
