//! Server error envelope

use serde::Deserialize;

/// Structured error information returned by the backend.
///
/// Failed requests answer with an envelope of the form
/// `{ "success": false, "error": { "code": 404, "message": "...", "details": {...} } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerErrorDetail {
    /// The HTTP-like status code echoed by the server.
    pub code: u16,
    /// Human-readable error message.
    pub message: String,
    /// Field or validation details, as sent.
    #[serde(default)]
    pub details: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    success: Option<bool>,
    error: ServerErrorDetail,
}

impl ServerErrorDetail {
    /// Parses an error response body, returning `None` if it is not an envelope.
    pub fn from_body(body: &str) -> Option<Self> {
        let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
        if envelope.success == Some(true) {
            return None;
        }
        Some(envelope.error)
    }

    /// Returns the messages reported for a single field, if any.
    ///
    /// Validation errors carry `details` as `{ "field": ["message", ...] }`.
    pub fn field_messages(&self, field: &str) -> Vec<&str> {
        match self.details.get(field) {
            Some(serde_json::Value::Array(items)) => {
                items.iter().filter_map(|v| v.as_str()).collect()
            }
            Some(serde_json::Value::String(s)) => vec![s.as_str()],
            _ => Vec::new(),
        }
    }
}

impl std::fmt::Display for ServerErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}
