//! Table view state and its mutation rules.

use std::collections::BTreeMap;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::config::TableConfig;

/// Sort direction for a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl SortOrder {
    /// Returns the opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// A scalar filter value.
///
/// `Null` and empty `Text` are considered empty and are never sent to the
/// server. A filter that was never set is simply absent from the map.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FilterValue {
    /// Returns `true` for values that must be dropped from the query string.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Renders the value as a query-string value, or `None` if it is empty.
    pub fn to_wire(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(if *b { "true" } else { "false" }.to_string()),
            Self::Int(n) => Some(n.to_string()),
            Self::Float(n) => Some(n.to_string()),
            Self::Text(s) if s.is_empty() => None,
            Self::Text(s) => Some(s.clone()),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for FilterValue {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Filters keyed by query parameter name.
pub type Filters = BTreeMap<String, FilterValue>;

/// One requested view of a server-paginated list.
#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    /// 1-based page number.
    pub page: u32,
    /// Rows per page, always greater than zero.
    pub page_size: u32,
    /// Column the server should order by.
    pub sort_by: Option<String>,
    /// Direction for `sort_by`.
    pub sort_order: Option<SortOrder>,
    /// Free-text search.
    pub search: Option<String>,
    /// Column filters.
    pub filters: Filters,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: None,
            sort_order: None,
            search: None,
            filters: Filters::new(),
        }
    }
}

/// Holds the current [`TableState`] and applies the table's mutation rules.
///
/// Every change to sorting, search, filters or page size returns the view to
/// page 1. `set_page` is unchecked; use [`Pagination`](super::Pagination) to
/// decide whether a page exists.
///
/// # Example
///
/// ```
/// use datagrid_lib::table::{SortOrder, TableStateStore};
///
/// let mut table = TableStateStore::default();
/// table.set_page(3);
/// table.set_sort("name");
/// assert_eq!(table.state().page, 1);
/// assert_eq!(table.state().sort_order, Some(SortOrder::Asc));
///
/// table.set_sort("name");
/// assert_eq!(table.state().sort_order, Some(SortOrder::Desc));
/// ```
#[derive(Debug, Clone)]
pub struct TableStateStore {
    initial: TableState,
    state: TableState,
}

impl Default for TableStateStore {
    fn default() -> Self {
        Self::new(TableState::default())
    }
}

impl TableStateStore {
    /// Creates a store starting from (and resetting to) `initial`.
    pub fn new(mut initial: TableState) -> Self {
        initial.page = initial.page.max(1);
        if initial.page_size == 0 {
            initial.page_size = DEFAULT_PAGE_SIZE;
        }
        Self {
            state: initial.clone(),
            initial,
        }
    }

    /// Creates a store from a [`TableConfig`].
    pub fn from_config(config: &TableConfig) -> Self {
        Self::new(config.initial_state())
    }

    /// Returns the current state.
    pub fn state(&self) -> &TableState {
        &self.state
    }

    /// Moves to page `page` without bounds checking.
    pub fn set_page(&mut self, page: u32) {
        self.state.page = page;
    }

    /// Changes the page size and returns to page 1.
    ///
    /// A size of zero is ignored apart from the page reset.
    pub fn set_page_size(&mut self, page_size: u32) {
        if page_size > 0 {
            self.state.page_size = page_size;
        }
        self.state.page = 1;
    }

    /// Sorts by `column`, flipping the direction if it is already the sort column.
    pub fn set_sort(&mut self, column: impl Into<String>) {
        let column = column.into();
        if self.state.sort_by.as_deref() == Some(column.as_str()) {
            let order = self.state.sort_order.unwrap_or(SortOrder::Asc);
            self.state.sort_order = Some(order.flipped());
        } else {
            self.state.sort_by = Some(column);
            self.state.sort_order = Some(SortOrder::Asc);
        }
        self.state.page = 1;
    }

    /// Removes any sort and returns to page 1.
    pub fn clear_sort(&mut self) {
        self.state.sort_by = None;
        self.state.sort_order = None;
        self.state.page = 1;
    }

    /// Replaces all filters and returns to page 1.
    pub fn set_filters(&mut self, filters: Filters) {
        self.state.filters = filters;
        self.state.page = 1;
    }

    /// Sets a single filter and returns to page 1.
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.state.filters.insert(key.into(), value.into());
        self.state.page = 1;
    }

    /// Removes a single filter and returns to page 1.
    pub fn remove_filter(&mut self, key: &str) {
        self.state.filters.remove(key);
        self.state.page = 1;
    }

    /// Replaces the search text and returns to page 1. Empty text clears it.
    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        self.state.search = if search.is_empty() { None } else { Some(search) };
        self.state.page = 1;
    }

    /// Restores the state the store was created with.
    pub fn reset(&mut self) {
        self.state = self.initial.clone();
    }
}
