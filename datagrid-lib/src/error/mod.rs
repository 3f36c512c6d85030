//! Error types

mod api;
mod auth;
mod server;
mod store;

pub use api::*;
pub use auth::*;
pub use server::*;
pub use store::*;

/// Top-level error returned by client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The list or export endpoint failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The token provider could not supply a token.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A key-value store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Writing an exported file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding JSON failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns the HTTP status code if the server answered with an error status.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(api) => api.status_code(),
            _ => None,
        }
    }
}
