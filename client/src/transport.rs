use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{ClientError, Result};

/// Executes a single GET. Connection pooling and TLS live behind this trait.
pub trait Transport: Send + Sync {
    fn send<'a>(
        &'a self,
        url: &'a Url,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, std::result::Result<HttpResponse, TransportError>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Reqwest error: {0}")]
    Request(reqwest::Error),
    #[error("Request cancelled")]
    Cancelled,
}

impl TransportError {
    /// Wrap a reqwest error with its URL removed; the URL carries the API key.
    pub fn request(err: reqwest::Error) -> Self {
        TransportError::Request(err.without_url())
    }
}

/// Default [`Transport`] on top of a pooled `reqwest::Client`.
///
/// Sends `Accept: application/json` and negotiates gzip.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, user_agent: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .gzip(true)
            .timeout(timeout);
        if let Some(agent) = user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(ClientError::Reqwest)?;
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        url: &'a Url,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, std::result::Result<HttpResponse, TransportError>> {
        Box::pin(async move {
            let exchange = async {
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(TransportError::request)?;
                let status = response.status().as_u16();
                let body = response.text().await.map_err(TransportError::request)?;
                Ok::<_, TransportError>(HttpResponse { status, body })
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(TransportError::Cancelled),
                result = exchange => result,
            }
        })
    }
}
