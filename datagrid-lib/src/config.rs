//! Client and table configuration

use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

use crate::error::Error;
use crate::table::FilterValue;
use crate::table::SortOrder;
use crate::table::TableState;

/// Page size used when a table does not ask for one (the backend's `PAGE_SIZE`).
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Connection settings for a [`GridClient`](crate::GridClient).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use datagrid_lib::config::ClientConfig;
///
/// let config = ClientConfig::new("https://hr.example.com/api/v1")
///     .with_organization_id("7c1f")
///     .with_timeout(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL list endpoints are resolved against.
    pub base_url: String,
    /// Tenant sent as `X-Organization-ID`, if any.
    pub organization_id: Option<String>,
    /// Per-request timeout.
    pub timeout: Option<Duration>,
    /// Connection timeout applied to the default HTTP client.
    pub connect_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Environment variable holding the base URL.
    pub const URL_VAR: &'static str = "DATAGRID_URL";
    /// Environment variable holding the tenant id.
    pub const ORGANIZATION_VAR: &'static str = "DATAGRID_ORGANIZATION_ID";
    /// Environment variable holding the request timeout in seconds.
    pub const TIMEOUT_VAR: &'static str = "DATAGRID_TIMEOUT_SECS";
    /// Environment variable holding the connect timeout in seconds.
    pub const CONNECT_TIMEOUT_VAR: &'static str = "DATAGRID_CONNECT_TIMEOUT_SECS";

    /// Creates a config for the given base URL with no tenant and no timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            organization_id: None,
            timeout: None,
            connect_timeout: None,
        }
    }

    /// Reads the config from `DATAGRID_*` environment variables.
    ///
    /// `DATAGRID_URL` is required; the rest are optional.
    pub fn from_env() -> Result<Self, Error> {
        let base_url = env::var(Self::URL_VAR)
            .map_err(|_| Error::Config(format!("{} is not set", Self::URL_VAR)))?;

        let mut config = Self::new(base_url);
        config.organization_id = env::var(Self::ORGANIZATION_VAR)
            .ok()
            .filter(|s| !s.is_empty());
        config.timeout = secs_var(Self::TIMEOUT_VAR)?;
        config.connect_timeout = secs_var(Self::CONNECT_TIMEOUT_VAR)?;
        Ok(config)
    }

    /// Sets the tenant id.
    pub fn with_organization_id(mut self, id: impl Into<String>) -> Self {
        self.organization_id = Some(id.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}

fn secs_var(name: &str) -> Result<Option<Duration>, Error> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| Error::Config(format!("{name} must be a whole number of seconds"))),
        _ => Ok(None),
    }
}

/// Initial view of a table, restored by [`TableStateStore::reset`](crate::table::TableStateStore::reset).
///
/// # Example
///
/// ```
/// use datagrid_lib::config::TableConfig;
/// use datagrid_lib::table::SortOrder;
///
/// let config = TableConfig::default()
///     .with_page_size(50)
///     .with_sort("last_name", SortOrder::Asc)
///     .with_filter("status", "active");
/// let state = config.initial_state();
/// assert_eq!(state.page, 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TableConfig {
    /// Rows per page. Zero is treated as [`DEFAULT_PAGE_SIZE`].
    pub page_size: u32,
    /// Initial sort column.
    pub sort_by: Option<String>,
    /// Initial sort direction, used only with `sort_by`.
    pub sort_order: Option<SortOrder>,
    /// Initial search text.
    pub search: Option<String>,
    /// Initial filters.
    pub filters: BTreeMap<String, FilterValue>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: None,
            sort_order: None,
            search: None,
            filters: BTreeMap::new(),
        }
    }
}

impl TableConfig {
    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the initial sort.
    pub fn with_sort(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(column.into());
        self.sort_order = Some(order);
        self
    }

    /// Sets the initial search text.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Adds an initial filter.
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Builds the first-page state for this configuration.
    pub fn initial_state(&self) -> TableState {
        let page_size = if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        };
        TableState {
            page: 1,
            page_size,
            sort_order: self
                .sort_by
                .as_ref()
                .map(|_| self.sort_order.unwrap_or(SortOrder::Asc)),
            sort_by: self.sort_by.clone(),
            search: self.search.clone().filter(|s| !s.is_empty()),
            filters: self.filters.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = TableConfig::default().initial_state();
        assert_eq!(state.page, 1);
        assert_eq!(state.page_size, 20);
        assert_eq!(state.sort_by, None);
        assert_eq!(state.sort_order, None);
        assert!(state.filters.is_empty());
    }

    #[test]
    fn test_zero_page_size_falls_back() {
        let state = TableConfig::default().with_page_size(0).initial_state();
        assert_eq!(state.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_sort_defaults_to_asc() {
        let config = TableConfig {
            sort_by: Some("hire_date".to_string()),
            ..TableConfig::default()
        };
        assert_eq!(config.initial_state().sort_order, Some(SortOrder::Asc));
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new("http://localhost:8000/api")
            .with_organization_id("org-1")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.organization_id.as_deref(), Some("org-1"));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.connect_timeout, None);
    }
}
