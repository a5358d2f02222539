use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn, Span};
use url::Url;

use crate::{
    envelope::Envelope,
    error::translate,
    request::{redact_key, Endpoint, RequestSpec},
    transport::{ReqwestTransport, Transport, TransportError},
    ClientError, CompanyResponse, FactionResponse, KeyResponse, MarketResponse, PropertyResponse,
    Result, TornResponse, UserResponse,
};

pub const DEFAULT_BASE_URL: &str = "https://api.torn.com/";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Selection used for the `key` endpoint when the caller gives none.
const DEFAULT_KEY_SELECTION: &str = "info";

/// Per-call parameters shared by every resource accessor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceQuery {
    pub id: Option<String>,
    pub selections: Vec<String>,
    pub comment: Option<String>,
}

impl ResourceQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id<S: Into<String>>(mut self, id: S) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn selections<I, S>(mut self, selections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selections = selections.into_iter().map(Into::into).collect();
        self
    }

    pub fn comment<S: Into<String>>(mut self, comment: S) -> Self {
        self.comment = Some(comment.into());
        self
    }

    fn into_spec(self, endpoint: Endpoint, key: &str) -> RequestSpec {
        let mut spec = RequestSpec::new(endpoint, key).selections(self.selections);
        if let Some(id) = self.id {
            spec = spec.resource(id);
        }
        if let Some(comment) = self.comment {
            spec = spec.comment(comment);
        }
        spec
    }
}

/// Builder for [`Client`].
pub struct ClientBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: Option<String>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
            transport: None,
        }
    }

    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Ignored when a custom transport is supplied
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ignored when a custom transport is supplied
    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn build(self) -> Result<Client> {
        // Without the trailing slash `Url::join` would drop the last path segment.
        let mut base = self.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(
                self.timeout,
                self.user_agent.as_deref(),
            )?),
        };

        Ok(Client {
            base_url,
            transport,
        })
    }
}

/// Async client for the Torn API.
///
/// Cheap to clone; clones share the underlying transport.
#[derive(Clone)]
pub struct Client {
    base_url: Url,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Client against the public API with default settings.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // Resource accessors

    pub async fn user(
        &self,
        key: &str,
        query: ResourceQuery,
        cancel: &CancellationToken,
    ) -> Result<Option<UserResponse>> {
        self.fetch(&query.into_spec(Endpoint::User, key), cancel).await
    }

    pub async fn faction(
        &self,
        key: &str,
        query: ResourceQuery,
        cancel: &CancellationToken,
    ) -> Result<Option<FactionResponse>> {
        self.fetch(&query.into_spec(Endpoint::Faction, key), cancel)
            .await
    }

    pub async fn company(
        &self,
        key: &str,
        query: ResourceQuery,
        cancel: &CancellationToken,
    ) -> Result<Option<CompanyResponse>> {
        self.fetch(&query.into_spec(Endpoint::Company, key), cancel)
            .await
    }

    pub async fn property(
        &self,
        key: &str,
        query: ResourceQuery,
        cancel: &CancellationToken,
    ) -> Result<Option<PropertyResponse>> {
        self.fetch(&query.into_spec(Endpoint::Property, key), cancel)
            .await
    }

    /// Item market data; `query.id` is the item id.
    pub async fn market(
        &self,
        key: &str,
        query: ResourceQuery,
        cancel: &CancellationToken,
    ) -> Result<Option<MarketResponse>> {
        self.fetch(&query.into_spec(Endpoint::Market, key), cancel)
            .await
    }

    /// Aggregate game data. At least one selection is required.
    pub async fn torn(
        &self,
        key: &str,
        query: ResourceQuery,
        cancel: &CancellationToken,
    ) -> Result<Option<TornResponse>> {
        self.fetch(&query.into_spec(Endpoint::Torn, key), cancel).await
    }

    /// Information about the key itself. Defaults to the `info` selection.
    pub async fn key(
        &self,
        key: &str,
        mut query: ResourceQuery,
        cancel: &CancellationToken,
    ) -> Result<Option<KeyResponse>> {
        if query.selections.is_empty() {
            query.selections.push(DEFAULT_KEY_SELECTION.to_string());
        }
        // The key endpoint is never addressed by id.
        query.id = None;
        self.fetch(&query.into_spec(Endpoint::Key, key), cancel).await
    }

    /// Build `spec` and dispatch it. See [`Client::fetch_url`].
    pub async fn fetch<T: Envelope>(
        &self,
        spec: &RequestSpec,
        cancel: &CancellationToken,
    ) -> Result<Option<T>> {
        let url = spec.build()?;
        self.fetch_url(&url, cancel).await
    }

    /// Fetch a URL relative to the base URL and decode it as `T`.
    ///
    /// `resource` is joined onto the base URL, so it should not start with
    /// `/`. Anything that resolves outside the base URL (another host, or a
    /// path above the base path) fails with `ClientError::InvalidUrl` before
    /// any request is sent.
    ///
    /// Resolves to exactly one of:
    /// - `Ok(Some(payload))` when the API answered without an embedded error,
    /// - `Err(ClientError::Api(_))` when it embedded one,
    /// - `Ok(None)` when the HTTP status was not a success or the transport
    ///   failed; these are logged but not raised.
    ///
    /// A malformed body fails with `ClientError::Json`, a fired token with
    /// `ClientError::Cancelled`.
    #[instrument(
        name = "torn_request",
        skip(self, resource, cancel),
        fields(
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
        )
    )]
    pub async fn fetch_url<T: Envelope>(
        &self,
        resource: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<T>> {
        let url = self
            .base_url
            .join(resource)
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        // Leading slashes or an absolute URL would escape the base and take the key with them.
        if url.origin() != self.base_url.origin() || !url.path().starts_with(self.base_url.path()) {
            return Err(ClientError::InvalidUrl(
                "resource must resolve under the base URL".to_string(),
            ));
        }
        let redacted = redact_key(&url);
        Span::current().record("http.url", redacted.as_str());
        debug!("sending request");

        let sent = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            sent = self.transport.send(&url, cancel) => sent,
        };

        let response = match sent {
            Ok(response) => response,
            Err(TransportError::Cancelled) => return Err(ClientError::Cancelled),
            Err(err) => {
                // TODO: surface transport failures once callers stop relying on `Ok(None)`.
                warn!(error = %err, "transport failed, returning no payload");
                return Ok(None);
            }
        };

        Span::current().record("http.status_code", response.status);
        if !response.is_success() {
            warn!(status = response.status, "non-success status, returning no payload");
            return Ok(None);
        }

        let mut payload: T = serde_json::from_str(&response.body)?;
        if let Some(info) = payload.take_error_info() {
            debug!(code = info.code, "response carried an API error");
            return Err(ClientError::Api(translate(info)));
        }

        debug!("response decoded");
        Ok(Some(payload))
    }
}
