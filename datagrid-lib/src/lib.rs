//! Server-driven data table client library
//!
//! A Rust async library for the list/export endpoints behind paginated
//! administration tables: table view state, wire-format query parameters,
//! page fetching, persisted column visibility and file export.

pub mod auth;
pub mod config;
pub mod error;
pub mod export;
pub mod response;
pub mod store;
pub mod table;

mod client;

pub use client::*;
pub use table::Page;
