//! Wire-format query parameters for list endpoints.
//!
//! The backend speaks snake_case: `page`, `page_size`, `ordering`, `search`,
//! followed by one parameter per active filter.

use super::state::SortOrder;
use super::state::TableState;

/// An insertion-ordered set of query parameters with unique keys.
///
/// Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Removes a parameter, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.pairs.iter().position(|(k, _)| k == key)?;
        Some(self.pairs.remove(index).1)
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Merges `other` over `self`; keys in `other` win.
    pub fn merge(&mut self, other: QueryParams) {
        for (key, value) in other.pairs {
            self.insert(key, value);
        }
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// Renders the `ordering` parameter: `column` or `-column`.
pub fn ordering(column: &str, order: SortOrder) -> String {
    match order {
        SortOrder::Asc => column.to_string(),
        SortOrder::Desc => format!("-{}", column),
    }
}

/// Derives list-endpoint query parameters from a table state.
///
/// Empty search text and empty filter values are omitted.
pub fn to_query_params(state: &TableState) -> QueryParams {
    let mut params = QueryParams::new();
    params.insert("page", state.page.to_string());
    params.insert("page_size", state.page_size.to_string());

    if let Some(column) = state.sort_by.as_deref().filter(|c| !c.is_empty()) {
        let order = state.sort_order.unwrap_or(SortOrder::Asc);
        params.insert("ordering", ordering(column, order));
    }

    if let Some(search) = state.search.as_deref().filter(|s| !s.is_empty()) {
        params.insert("search", search);
    }

    for (key, value) in &state.filters {
        if let Some(value) = value.to_wire() {
            params.insert(key.as_str(), value);
        }
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::FilterValue;
    use crate::table::Filters;

    #[test]
    fn test_full_state() {
        let state = TableState {
            page: 2,
            page_size: 25,
            sort_by: Some("name".to_string()),
            sort_order: Some(SortOrder::Desc),
            search: Some("ann".to_string()),
            filters: Filters::from([("dept".to_string(), "eng".into())]),
        };
        let expected: QueryParams = [
            ("page", "2"),
            ("page_size", "25"),
            ("ordering", "-name"),
            ("search", "ann"),
            ("dept", "eng"),
        ]
        .into_iter()
        .collect();
        assert_eq!(to_query_params(&state), expected);
    }

    #[test]
    fn test_empty_filters_dropped() {
        let state = TableState {
            filters: Filters::from([
                ("a".to_string(), FilterValue::from("")),
                ("b".to_string(), FilterValue::Null),
                ("c".to_string(), FilterValue::from(None::<String>)),
                ("d".to_string(), FilterValue::from("x")),
            ]),
            ..TableState::default()
        };
        let params = to_query_params(&state);
        assert_eq!(params.get("d"), Some("x"));
        assert_eq!(params.get("a"), None);
        assert_eq!(params.get("b"), None);
        assert_eq!(params.get("c"), None);
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_no_sort_no_search() {
        let params = to_query_params(&TableState::default());
        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["page", "page_size"]);
    }

    #[test]
    fn test_ascending_ordering_is_bare() {
        let state = TableState {
            sort_by: Some("hire_date".to_string()),
            sort_order: Some(SortOrder::Asc),
            ..TableState::default()
        };
        assert_eq!(to_query_params(&state).get("ordering"), Some("hire_date"));
    }

    #[test]
    fn test_merge_overrides() {
        let mut params = QueryParams::new().with("page", "1").with("page_size", "20");
        params.merge(QueryParams::new().with("page_size", "100").with("status", "open"));
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(
            pairs,
            vec![("page", "1"), ("page_size", "100"), ("status", "open")]
        );
    }

    #[test]
    fn test_remove() {
        let mut params = QueryParams::new().with("a", "1").with("b", "2");
        assert_eq!(params.remove("a").as_deref(), Some("1"));
        assert_eq!(params.remove("a"), None);
        assert_eq!(params.len(), 1);
    }
}
