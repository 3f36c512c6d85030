//! Authentication
//!
//! The client does not run any sign-in flow itself. It asks an injected
//! [`TokenProvider`] for a bearer token before every request.

mod token;

pub use token::AccessToken;
pub use token::StaticTokenProvider;
pub use token::TokenProvider;
