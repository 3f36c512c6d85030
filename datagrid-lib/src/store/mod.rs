//! Key-value storage for per-user table preferences
//!
//! Provides a `KeyValueStore` trait and implementations used to persist
//! column-visibility overrides across sessions.

mod memory;
mod sqlite;

pub use memory::*;
pub use sqlite::*;

use async_trait::async_trait;

use crate::error::StoreError;

/// Trait for string key-value stores.
///
/// Values are opaque strings (column visibility stores JSON arrays).
///
/// # Example
///
/// ```ignore
/// use datagrid_lib::store::{InMemoryStore, KeyValueStore};
///
/// let store = InMemoryStore::new();
/// store.set("employees.columns", r#"["name","email"]"#.to_string()).await?;
/// assert!(store.get("employees.columns").await?.is_some());
/// ```
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Retrieves the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
