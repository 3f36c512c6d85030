//! Authentication error types

/// Errors a [`TokenProvider`](crate::auth::TokenProvider) can report.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No token is available (the user is signed out).
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Access token expired and could not be refreshed.
    #[error("Token expired and refresh failed: {message}")]
    TokenExpired { message: String },

    /// Any other provider-specific failure.
    #[error("Token provider error: {0}")]
    Provider(String),
}
