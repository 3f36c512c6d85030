//! Page fetcher for list endpoints.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use serde::de::DeserializeOwned;

use crate::GridClient;
use crate::error::Error;

use super::page::Page;
use super::params::QueryParams;
use super::params::to_query_params;
use super::state::TableState;

type ParamMapper = Arc<dyn Fn(&TableState) -> QueryParams + Send + Sync>;

/// Turns a [`TableState`] into one list request.
///
/// Use [`GridClient::fetcher`] to create a fetcher.
///
/// # Example
///
/// ```ignore
/// let fetcher = client
///     .fetcher::<LeaveRequest>("/leave/requests/")
///     .map_params(|state| {
///         QueryParams::new().with("include_cancelled", "false")
///     });
///
/// let page = fetcher.fetch(table.state()).await?;
/// ```
pub struct Fetcher<Row> {
    client: GridClient,
    endpoint: String,
    mapper: Option<ParamMapper>,
    latest: Arc<LatestRequest>,
    _row: PhantomData<fn() -> Row>,
}

impl<Row> Clone for Fetcher<Row> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            endpoint: self.endpoint.clone(),
            mapper: self.mapper.clone(),
            latest: self.latest.clone(),
            _row: PhantomData,
        }
    }
}

impl<Row> fmt::Debug for Fetcher<Row> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetcher")
            .field("endpoint", &self.endpoint)
            .field("mapper", &self.mapper.is_some())
            .finish()
    }
}

impl<Row: DeserializeOwned> Fetcher<Row> {
    pub(crate) fn new(client: GridClient, endpoint: String) -> Self {
        Self {
            client,
            endpoint,
            mapper: None,
            latest: Arc::new(LatestRequest::new()),
            _row: PhantomData,
        }
    }

    /// Installs a parameter mapper whose output is merged over the derived
    /// parameters. Keys it returns replace derived ones.
    pub fn map_params<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&TableState) -> QueryParams + Send + Sync + 'static,
    {
        self.mapper = Some(Arc::new(mapper));
        self
    }

    /// Returns the endpoint this fetcher queries.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the generation tracker shared by clones of this fetcher.
    pub fn latest(&self) -> &LatestRequest {
        &self.latest
    }

    /// Builds the exact query parameters a fetch of `state` would send.
    pub fn params(&self, state: &TableState) -> QueryParams {
        let mut params = to_query_params(state);
        if let Some(mapper) = &self.mapper {
            params.merge(mapper(state));
        }
        log::trace!("{} params: {:?}", self.endpoint, params);
        params
    }

    /// Fetches the page described by `state`.
    ///
    /// Exactly one GET is issued; errors are returned unchanged.
    pub async fn fetch(&self, state: &TableState) -> Result<Page<Row>, Error> {
        let params = self.params(state);
        self.client.list(&self.endpoint, &params).await
    }

    /// Fetches `state`, discarding the outcome if a newer fetch was started
    /// through this fetcher (or a clone) in the meantime.
    ///
    /// Returns `Ok(None)` for superseded requests, whether they succeeded or
    /// failed, so only the newest request can update the view.
    pub async fn fetch_latest(&self, state: &TableState) -> Result<Option<Page<Row>>, Error> {
        let generation = self.latest.begin();
        let result = self.fetch(state).await;

        if !self.latest.is_current(generation) {
            log::debug!(
                "discarding stale response for {} (generation {})",
                self.endpoint,
                generation.0
            );
            return Ok(None);
        }
        result.map(Some)
    }
}

/// Identifier of one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

/// Hands out increasing request generations; only the newest is current.
#[derive(Debug, Default)]
pub struct LatestRequest {
    current: AtomicU64,
}

impl LatestRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new request, superseding every earlier one.
    pub fn begin(&self) -> Generation {
        Generation(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Returns `true` if no request was started after `generation`.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.current.load(Ordering::SeqCst) == generation.0
    }

    /// Supersedes all in-flight requests without starting a new one.
    pub fn invalidate(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }
}
