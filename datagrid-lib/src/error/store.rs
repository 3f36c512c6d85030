//! Key-value store error types

/// Errors raised by [`KeyValueStore`](crate::store::KeyValueStore) backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The SQLite backend failed.
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),

    /// A stored value could not be decoded.
    #[error("corrupt value for key '{key}': {message}")]
    Corrupt { key: String, message: String },
}
