pub use crate::envelope::{Envelope, ErrorInfo};
pub use crate::error::{translate, DomainError, ErrorKind};
pub use crate::http::{Client, ClientBuilder, ResourceQuery};
pub use crate::request::{Endpoint, RequestSpec};
pub use crate::responses::*;
pub use crate::transport::{HttpResponse, ReqwestTransport, Transport, TransportError};
pub use tokio_util::sync::CancellationToken;

pub mod envelope;
pub mod error;
pub mod http;
pub mod request;
pub mod responses;
pub mod timestamp;
pub mod transport;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Reqwest error: {0}")]
    Reqwest(reqwest::Error),
    #[error("JSON serialization/deserialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("API error: {0}")]
    Api(#[from] DomainError),
    #[error("Request cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, ClientError>;
