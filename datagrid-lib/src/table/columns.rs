//! Column definitions and per-user column visibility.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Map;
use serde_json::Value;

use crate::store::KeyValueStore;

/// Access to a row's cell values by column key.
pub trait TableRow {
    /// Returns the raw value for `key`, or `None` if the row has no such field.
    fn cell(&self, key: &str) -> Option<Value>;
}

impl TableRow for Map<String, Value> {
    fn cell(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

impl TableRow for Value {
    fn cell(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

/// Custom cell renderer: receives the raw cell value and the whole row.
pub type CellRenderer<Row> = Arc<dyn Fn(Option<&Value>, &Row) -> String + Send + Sync>;

/// One column of a table.
///
/// # Example
///
/// ```
/// use datagrid_lib::table::ColumnDefinition;
/// use serde_json::{Value, json};
///
/// let status = ColumnDefinition::<Value>::new("status", "Status")
///     .width("120px")
///     .render(|value, _row| match value.and_then(Value::as_str) {
///         Some("active") => "Active".to_string(),
///         _ => "Inactive".to_string(),
///     });
///
/// assert_eq!(status.display(&json!({"status": "active"})), "Active");
/// ```
pub struct ColumnDefinition<Row> {
    key: String,
    header: String,
    width: Option<String>,
    render: Option<CellRenderer<Row>>,
}

impl<Row> Clone for ColumnDefinition<Row> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            header: self.header.clone(),
            width: self.width.clone(),
            render: self.render.clone(),
        }
    }
}

impl<Row> fmt::Debug for ColumnDefinition<Row> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDefinition")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("width", &self.width)
            .field("render", &self.render.is_some())
            .finish()
    }
}

impl<Row> ColumnDefinition<Row> {
    /// Creates a column displaying the row field `key` under `header`.
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            width: None,
            render: None,
        }
    }

    /// Sets a display width hint (e.g. `"120px"`, `"20%"`).
    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    /// Sets a custom cell renderer.
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(Option<&Value>, &Row) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn width_hint(&self) -> Option<&str> {
        self.width.as_deref()
    }

    pub fn has_renderer(&self) -> bool {
        self.render.is_some()
    }
}

impl<Row: TableRow> ColumnDefinition<Row> {
    /// Renders this column's cell for `row`.
    ///
    /// Without a renderer, strings are shown as is, `null` and missing
    /// fields as an empty cell, and other values as JSON.
    pub fn display(&self, row: &Row) -> String {
        let value = row.cell(&self.key);
        match &self.render {
            Some(render) => render(value.as_ref(), row),
            None => match value {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s,
                Some(other) => other.to_string(),
            },
        }
    }
}

/// Where a table's visibility override is persisted.
#[derive(Clone)]
pub struct VisibilityStorage {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl VisibilityStorage {
    /// Persists under `key` in `store`.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Which columns of a table are shown.
///
/// Starts from the persisted override when one exists and parses, otherwise
/// from all columns. Every change is written back to storage; storage errors
/// are logged and otherwise ignored so a broken store never blocks the table.
///
/// # Example
///
/// ```ignore
/// let storage = VisibilityStorage::new(store, "employees.columns");
/// let mut columns = ColumnVisibility::load(definitions, Some(storage)).await;
///
/// columns.toggle_column("salary").await;
/// for column in columns.filtered_columns() {
///     println!("{}", column.header());
/// }
/// ```
pub struct ColumnVisibility<Row> {
    columns: Vec<ColumnDefinition<Row>>,
    visible: BTreeSet<String>,
    storage: Option<VisibilityStorage>,
}

impl<Row> ColumnVisibility<Row> {
    /// Creates visibility state with every column shown and no persistence.
    pub fn new(columns: Vec<ColumnDefinition<Row>>) -> Self {
        warn_duplicate_keys(&columns);
        let visible = all_keys(&columns);
        Self {
            columns,
            visible,
            storage: None,
        }
    }

    /// Creates visibility state, restoring a persisted override if present.
    pub async fn load(columns: Vec<ColumnDefinition<Row>>, storage: Option<VisibilityStorage>) -> Self {
        let mut this = Self::new(columns);
        if let Some(storage) = &storage {
            if let Some(saved) = read_override(storage).await {
                this.visible = saved;
            }
        }
        this.storage = storage;
        this
    }

    /// Returns all column definitions in their original order.
    pub fn columns(&self) -> &[ColumnDefinition<Row>] {
        &self.columns
    }

    /// Returns the keys of the visible columns.
    pub fn visible_columns(&self) -> &BTreeSet<String> {
        &self.visible
    }

    /// Returns `true` if the column `key` is shown.
    pub fn is_visible(&self, key: &str) -> bool {
        self.visible.contains(key)
    }

    /// Returns `true` if the user has hidden at least one column.
    pub fn is_customized(&self) -> bool {
        self.visible != all_keys(&self.columns)
    }

    /// The visible column definitions, in definition order.
    pub fn filtered_columns(&self) -> Vec<&ColumnDefinition<Row>> {
        self.columns
            .iter()
            .filter(|column| self.visible.contains(column.key()))
            .collect()
    }

    /// Shows `key` if hidden, hides it if shown, and persists the result.
    pub async fn toggle_column(&mut self, key: &str) {
        if !self.visible.remove(key) {
            self.visible.insert(key.to_string());
        }
        self.persist().await;
    }

    /// Shows every column and removes the persisted override.
    pub async fn reset_columns(&mut self) {
        self.visible = all_keys(&self.columns);
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.store.remove(&storage.key).await {
                log::warn!("failed to clear column override '{}': {}", storage.key, e);
            }
        }
    }

    /// Visible keys in definition order, then any keys without a definition.
    fn ordered_visible(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .columns
            .iter()
            .map(ColumnDefinition::key)
            .filter(|key| self.visible.contains(*key))
            .collect();
        keys.extend(
            self.visible
                .iter()
                .map(String::as_str)
                .filter(|key| !self.columns.iter().any(|c| c.key() == *key)),
        );
        keys
    }

    async fn persist(&self) {
        let Some(storage) = &self.storage else {
            return;
        };
        let value = match serde_json::to_string(&self.ordered_visible()) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("failed to encode column override '{}': {}", storage.key, e);
                return;
            }
        };
        if let Err(e) = storage.store.set(&storage.key, value).await {
            log::warn!("failed to save column override '{}': {}", storage.key, e);
        }
    }
}

async fn read_override(storage: &VisibilityStorage) -> Option<BTreeSet<String>> {
    let raw = match storage.store.get(&storage.key).await {
        Ok(raw) => raw?,
        Err(e) => {
            log::warn!("failed to read column override '{}': {}", storage.key, e);
            return None;
        }
    };
    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(keys) => Some(keys.into_iter().collect()),
        Err(e) => {
            log::warn!("ignoring corrupt column override '{}': {}", storage.key, e);
            None
        }
    }
}

fn all_keys<Row>(columns: &[ColumnDefinition<Row>]) -> BTreeSet<String> {
    columns.iter().map(|c| c.key().to_string()).collect()
}

fn warn_duplicate_keys<Row>(columns: &[ColumnDefinition<Row>]) {
    let mut seen = BTreeSet::new();
    for column in columns {
        if !seen.insert(column.key()) {
            log::warn!("duplicate column key '{}'", column.key());
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::error::StoreError;
    use crate::store::InMemoryStore;

    fn definitions() -> Vec<ColumnDefinition<Value>> {
        vec![
            ColumnDefinition::new("name", "Name"),
            ColumnDefinition::new("email", "Email").width("240px"),
            ColumnDefinition::new("department", "Department"),
            ColumnDefinition::new("salary", "Salary"),
        ]
    }

    fn keys(columns: &ColumnVisibility<Value>) -> Vec<&str> {
        columns.filtered_columns().iter().map(|c| c.key()).collect()
    }

    async fn persisted(store: &InMemoryStore, key: &str) -> Option<Vec<String>> {
        let raw = store.get(key).await.unwrap()?;
        Some(serde_json::from_str(&raw).unwrap())
    }

    #[tokio::test]
    async fn test_defaults_to_all_columns() {
        let store = Arc::new(InMemoryStore::new());
        let storage = VisibilityStorage::new(store.clone(), "employees");
        let columns = ColumnVisibility::load(definitions(), Some(storage)).await;
        assert_eq!(keys(&columns), vec!["name", "email", "department", "salary"]);
        assert!(!columns.is_customized());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_restores_override() {
        let store = Arc::new(InMemoryStore::new());
        store
            .set("employees", r#"["salary","name"]"#.to_string())
            .await
            .unwrap();
        let storage = VisibilityStorage::new(store.clone(), "employees");
        let columns = ColumnVisibility::load(definitions(), Some(storage)).await;
        assert_eq!(keys(&columns), vec!["name", "salary"]);
        assert!(columns.is_customized());
    }

    #[tokio::test]
    async fn test_corrupt_override_falls_back() {
        let store = Arc::new(InMemoryStore::new());
        store.set("employees", "{not json".to_string()).await.unwrap();
        let storage = VisibilityStorage::new(store.clone(), "employees");
        let columns = ColumnVisibility::load(definitions(), Some(storage)).await;
        assert_eq!(columns.visible_columns().len(), 4);
    }

    #[tokio::test]
    async fn test_toggle_is_its_own_inverse() {
        let store = Arc::new(InMemoryStore::new());
        let storage = VisibilityStorage::new(store.clone(), "employees");
        let mut columns = ColumnVisibility::load(definitions(), Some(storage)).await;
        let before = columns.visible_columns().clone();

        columns.toggle_column("email").await;
        assert!(!columns.is_visible("email"));
        assert_eq!(
            persisted(&store, "employees").await,
            Some(vec!["name".to_string(), "department".to_string(), "salary".to_string()])
        );

        columns.toggle_column("email").await;
        assert_eq!(columns.visible_columns(), &before);
        assert_eq!(
            persisted(&store, "employees").await.map(|k| k.len()),
            Some(4)
        );
    }

    #[tokio::test]
    async fn test_reset_removes_override() {
        let store = Arc::new(InMemoryStore::new());
        let storage = VisibilityStorage::new(store.clone(), "employees");
        let mut columns = ColumnVisibility::load(definitions(), Some(storage)).await;
        columns.toggle_column("salary").await;
        columns.toggle_column("name").await;
        columns.reset_columns().await;

        assert_eq!(columns.visible_columns().len(), 4);
        assert!(!store.contains_key("employees"));
    }

    #[tokio::test]
    async fn test_without_storage() {
        let mut columns = ColumnVisibility::new(definitions());
        columns.toggle_column("department").await;
        assert_eq!(keys(&columns), vec!["name", "email", "salary"]);
        columns.reset_columns().await;
        assert_eq!(keys(&columns).len(), 4);
    }

    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Corrupt {
                key: key.to_string(),
                message: "unreadable".to_string(),
            })
        }

        async fn set(&self, key: &str, _value: String) -> Result<(), StoreError> {
            Err(StoreError::Corrupt {
                key: key.to_string(),
                message: "read-only".to_string(),
            })
        }

        async fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_store_failures_do_not_block() {
        let storage = VisibilityStorage::new(Arc::new(BrokenStore), "employees");
        let mut columns = ColumnVisibility::load(definitions(), Some(storage)).await;
        assert_eq!(columns.visible_columns().len(), 4);
        columns.toggle_column("salary").await;
        assert!(!columns.is_visible("salary"));
    }

    #[test]
    fn test_display() {
        let row = json!({"name": "Ann", "salary": 5200, "manager": null});
        let columns = definitions();
        assert_eq!(columns[0].display(&row), "Ann");
        assert_eq!(columns[3].display(&row), "5200");
        assert_eq!(ColumnDefinition::<Value>::new("manager", "Manager").display(&row), "");
        assert_eq!(ColumnDefinition::<Value>::new("missing", "Missing").display(&row), "");

        let salary = ColumnDefinition::<Value>::new("salary", "Salary").render(|value, row| {
            format!(
                "{} ({})",
                value.and_then(Value::as_u64).unwrap_or(0),
                row["name"].as_str().unwrap_or("")
            )
        });
        assert_eq!(salary.display(&row), "5200 (Ann)");
    }
}
