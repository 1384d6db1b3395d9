use std::future::Future;
use std::time::Duration;

use http::header::{AUTHORIZATION, COOKIE};
use http::{Method, StatusCode};
use naff_types::{BearerToken, ACCESS_TOKEN_COOKIE};
use thiserror::Error;

/// One outbound call to the backend. The token is mandatory; there is no way
/// to build an unauthenticated request.
#[derive(Clone, Debug)]
pub struct BackendRequest {
    pub method: Method,
    pub url: String,
    pub token: BearerToken,
}

#[derive(Clone, Debug)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Other(String),
}

impl TransportError {
    /// Failures where the backend never saw (or never answered) the request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Timeout | TransportError::Connect(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

/// The mechanism that moves a [`BackendRequest`] over the wire.
///
/// [`ReqwestTransport`] is the production implementation; tests swap in a
/// scripted one.
pub trait Transport: Send + Sync + 'static {
    fn send(
        &self,
        request: BackendRequest,
    ) -> impl Future<Output = Result<BackendResponse, TransportError>> + Send;
}

#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { http })
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: BackendRequest) -> Result<BackendResponse, TransportError> {
        let token = request.token.as_str();
        let cookieValue = format!("{ACCESS_TOKEN_COOKIE}={token}");

        let response = self
            .http
            .request(request.method, request.url.as_str())
            .header(AUTHORIZATION, token)
            .header(COOKIE, cookieValue)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?.to_vec();

        Ok(BackendResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pre_response_failures_are_retryable() {
        assert!(TransportError::Timeout.is_retryable());
        assert!(TransportError::Connect("refused".into()).is_retryable());
        assert!(!TransportError::Other("bad header".into()).is_retryable());
    }

    #[test]
    fn reqwest_transport_builds_with_timeout() {
        assert!(ReqwestTransport::new(Duration::from_secs(5)).is_ok());
    }
}
