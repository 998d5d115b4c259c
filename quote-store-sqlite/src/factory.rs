use async_trait::async_trait;

use quote_core::db::{QuoteStore, StoreConfig, StoreError, StoreFactory};

use crate::store::SqliteStore;

/// [`StoreFactory`] for SQLite.
///
/// Register this with a [`quote_core::db::StoreRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use quote_core::db::StoreRegistry;
/// use quote_store_sqlite::SqliteStoreFactory;
///
/// let mut registry = StoreRegistry::new();
/// registry.register(Box::new(SqliteStoreFactory));
/// ```
pub struct SqliteStoreFactory;

impl SqliteStoreFactory {
    /// Maps the configured connection value onto an sqlx URL.
    ///
    /// Accepted values:
    /// * A bare file path — e.g. `"quotes.db"`. The file is created if it
    ///   does not exist.
    /// * `":memory:"` — an ephemeral in-memory database (useful for tests).
    /// * A full `sqlite:` URL, passed through unchanged.
    fn database_url(connection: &str) -> String {
        if connection == ":memory:" {
            "sqlite::memory:".to_string()
        } else if connection.starts_with("sqlite:") {
            connection.to_string()
        } else {
            format!("sqlite:{}?mode=rwc", connection)
        }
    }
}

#[async_trait]
impl StoreFactory for SqliteStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn QuoteStore>, StoreError> {
        let url = Self::database_url(&config.connection);
        let store = SqliteStore::new(&url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Box::new(store))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use quote_core::db::StoreFactory;

    use super::*;

    #[test]
    fn backend_name_is_sqlite() {
        assert_eq!(SqliteStoreFactory.backend_name(), "sqlite");
    }

    #[test]
    fn connection_values_map_onto_sqlx_urls() {
        assert_eq!(
            SqliteStoreFactory::database_url(":memory:"),
            "sqlite::memory:"
        );
        assert_eq!(
            SqliteStoreFactory::database_url("quotes.db"),
            "sqlite:quotes.db?mode=rwc"
        );
        assert_eq!(
            SqliteStoreFactory::database_url("sqlite:custom.db"),
            "sqlite:custom.db"
        );
    }

    #[tokio::test]
    async fn creates_an_in_memory_store() {
        let config = StoreConfig {
            backend: "sqlite".to_string(),
            connection: ":memory:".to_string(),
        };

        let store = SqliteStoreFactory.create(&config).await.unwrap();
        store.set("probe", "1").await.unwrap();

        assert_eq!(store.get("probe").await, Ok(Some("1".to_string())));
    }
}
