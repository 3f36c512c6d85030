//! List response normalization
//!
//! List endpoints do not agree on a single payload shape. Some return a bare
//! JSON array, paginated ones return `{ "count": N, "results": [...] }`, and a
//! few report views wrap rows as `{ "data": [...] }`. All of them are turned
//! into a [`Page`].

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::table::Page;

/// Normalizes any supported list payload into a page of `Row`.
///
/// When the payload carries no `count`, the number of rows is used.
pub fn normalize_list<Row: DeserializeOwned>(body: Value) -> Result<Page<Row>, ApiError> {
    let (rows, count) = match body {
        Value::Array(rows) => (rows, None),
        Value::Object(mut map) => {
            let count = map.get("count").and_then(Value::as_u64);
            let rows = match map.remove("results").or_else(|| map.remove("data")) {
                Some(Value::Array(rows)) => rows,
                Some(other) => {
                    return Err(ApiError::parse_with_body(
                        "list payload rows are not an array",
                        other.to_string(),
                    ));
                }
                None => {
                    return Err(ApiError::parse(
                        "list payload has neither 'results' nor 'data'",
                    ));
                }
            };
            (rows, count)
        }
        other => {
            return Err(ApiError::parse_with_body(
                "unexpected list payload",
                other.to_string(),
            ));
        }
    };

    let count = count.unwrap_or(rows.len() as u64);
    let results = rows
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<Row>, _>>()
        .map_err(|e| ApiError::parse(format!("invalid row: {}", e)))?;

    Ok(Page::new(results, count))
}
