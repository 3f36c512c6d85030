//! Main GridClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::ACCEPT;
use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::TokenProvider;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::error::Error;
use crate::response::normalize_list;
use crate::table::Fetcher;
use crate::table::Page;
use crate::table::QueryParams;

/// Header carrying the tenant the request acts for.
pub const ORGANIZATION_HEADER: &str = "X-Organization-ID";

/// The client for list and export endpoints.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across threads safely.
///
/// # Example
///
/// ```ignore
/// use datagrid_lib::{GridClient, auth::StaticTokenProvider};
///
/// let client = GridClient::builder()
///     .url("https://hr.example.com/api/v1")
///     .token_provider(StaticTokenProvider::new("my-token"))
///     .organization_id("7c1f0d2e")
///     .build();
///
/// let page = client.fetcher::<Employee>("/employees/").fetch(table.state()).await?;
/// ```
#[derive(Clone)]
pub struct GridClient {
    inner: Arc<GridClientInner>,
}

struct GridClientInner {
    base_url: String,
    organization_id: Option<String>,
    token_provider: Arc<dyn TokenProvider>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl GridClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> GridClientBuilder<Missing, Missing> {
        GridClientBuilder::new()
    }

    /// Creates a client from a [`ClientConfig`].
    pub fn from_config<T: TokenProvider + 'static>(config: ClientConfig, provider: T) -> Self {
        let mut builder = Self::builder().url(config.base_url).token_provider(provider);
        if let Some(id) = config.organization_id {
            builder = builder.organization_id(id);
        }
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        builder.build()
    }

    /// Returns the base URL endpoints are resolved against.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns the tenant id sent with every request, if any.
    pub fn organization_id(&self) -> Option<&str> {
        self.inner.organization_id.as_deref()
    }

    /// Creates a page fetcher for a list endpoint.
    ///
    /// `endpoint` is relative to the base URL (e.g. `/employees/`) or absolute.
    pub fn fetcher<Row: DeserializeOwned>(&self, endpoint: impl Into<String>) -> Fetcher<Row> {
        Fetcher::new(self.clone(), endpoint.into())
    }

    /// Fetches one page from a list endpoint with explicit parameters.
    pub async fn list<Row: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &QueryParams,
    ) -> Result<Page<Row>, Error> {
        let response = self.get(endpoint, params).await?;
        let body: serde_json::Value = response.json().await.map_err(ApiError::from)?;
        Ok(normalize_list(body)?)
    }

    /// Resolves `path` against the base URL and appends `params`.
    pub fn endpoint_url(&self, path: &str, params: &QueryParams) -> Result<Url, Error> {
        let joined = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!(
                "{}/{}",
                self.inner.base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        };

        let mut url = Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{joined}: {e}")))?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params.iter() {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Issues a single authenticated GET.
    ///
    /// Non-2xx responses become [`ApiError::Http`]. Nothing is retried.
    pub(crate) async fn get(&self, path: &str, params: &QueryParams) -> Result<reqwest::Response, Error> {
        let url = self.endpoint_url(path, params)?;

        let token = self
            .inner
            .token_provider
            .get_token(&self.inner.base_url)
            .await?;

        log::debug!("GET {}", url);

        let mut request = self
            .inner
            .http_client
            .get(url.as_str())
            .header(ACCEPT, HeaderValue::from_static("application/json, */*"))
            .bearer_auth(&token.access_token);

        if let Some(id) = &self.inner.organization_id {
            request = request.header(ORGANIZATION_HEADER, id.as_str());
        }

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            log::debug!("GET {} failed with {}", url, status);
            Err(Error::Api(ApiError::from_body(status.as_u16(), body)))
        }
    }

    fn transport_error(&self, error: reqwest::Error) -> Error {
        match self.inner.timeout {
            Some(timeout) if error.is_timeout() => Error::Api(ApiError::Timeout(timeout)),
            _ => Error::Api(ApiError::Network(error)),
        }
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`GridClient`].
///
/// Uses the typestate pattern to ensure required fields are set at compile time.
///
/// # Required Fields
///
/// - `url` - The API base URL
/// - `token_provider` - A [`TokenProvider`] implementation
pub struct GridClientBuilder<U, P> {
    url: U,
    token_provider: P,
    organization_id: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl GridClientBuilder<Missing, Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            token_provider: Missing,
            organization_id: None,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }
}

impl Default for GridClientBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> GridClientBuilder<Missing, P> {
    /// Sets the API base URL.
    pub fn url(self, url: impl Into<String>) -> GridClientBuilder<Set<String>, P> {
        GridClientBuilder {
            url: Set(url.into()),
            token_provider: self.token_provider,
            organization_id: self.organization_id,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U> GridClientBuilder<U, Missing> {
    /// Sets the token provider for authentication.
    pub fn token_provider<T: TokenProvider + 'static>(
        self,
        provider: T,
    ) -> GridClientBuilder<U, Set<Arc<dyn TokenProvider>>> {
        GridClientBuilder {
            url: self.url,
            token_provider: Set(Arc::new(provider) as Arc<dyn TokenProvider>),
            organization_id: self.organization_id,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U, P> GridClientBuilder<U, P> {
    /// Sets the tenant sent as `X-Organization-ID`.
    pub fn organization_id(mut self, id: impl Into<String>) -> Self {
        self.organization_id = Some(id.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl GridClientBuilder<Set<String>, Set<Arc<dyn TokenProvider>>> {
    /// Builds the [`GridClient`].
    ///
    /// This method is only available when both `url` and `token_provider` have been set.
    pub fn build(self) -> GridClient {
        let http_client = self.http_client.unwrap_or_else(|| {
            let mut builder = Client::builder();
            if let Some(timeout) = self.connect_timeout {
                builder = builder.connect_timeout(timeout);
            }
            builder.build().unwrap_or_default()
        });

        GridClient {
            inner: Arc::new(GridClientInner {
                base_url: self.url.0,
                organization_id: self.organization_id,
                token_provider: self.token_provider.0,
                http_client,
                timeout: self.timeout,
            }),
        }
    }
}
