use async_trait::async_trait;
use thiserror::Error;

/// Storage key for the single last-saved quote record.
pub const LAST_SAVED_KEY: &str = "hibalogique_quote_last_v1";

/// Storage key for the saved-quotation history collection.
pub const HISTORY_KEY: &str = "hibalogique_quotes_history_v1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// The persistent key-value collaborator behind the history store.
///
/// Keys and values are plain strings; values hold serialized JSON
/// documents. Implementations must make `set` atomic per key — a failed
/// `set` leaves the previous value readable.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Every key currently present, sorted.
    async fn keys(&self) -> Result<Vec<String>, StoreError>;
}
