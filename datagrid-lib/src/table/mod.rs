//! Server-driven table building blocks.
//!
//! - [`TableStateStore`] - page, page size, sort, search and filters
//! - [`to_query_params`] - the state as list-endpoint query parameters
//! - [`Fetcher`] - one list request per state
//! - [`Page`] / [`Pagination`] - results and navigation bounds
//! - [`ColumnVisibility`] - which columns are shown, persisted per user

mod columns;
mod fetcher;
mod page;
mod params;
mod state;

pub use columns::CellRenderer;
pub use columns::ColumnDefinition;
pub use columns::ColumnVisibility;
pub use columns::TableRow;
pub use columns::VisibilityStorage;
pub use fetcher::Fetcher;
pub use fetcher::Generation;
pub use fetcher::LatestRequest;
pub use page::Page;
pub use page::Pagination;
pub use params::QueryParams;
pub use params::ordering;
pub use params::to_query_params;
pub use state::FilterValue;
pub use state::Filters;
pub use state::SortOrder;
pub use state::TableState;
pub use state::TableStateStore;
