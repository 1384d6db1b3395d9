use thiserror::Error;

use crate::transport::TransportError;

/// Backend error code meaning the presented token is no longer accepted and
/// the user must sign in again.
pub const STALE_SESSION_CODE: u16 = 243;

/// Error reported by the backend in the body of a non-200 response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (code {code})")]
pub struct ApiError {
    pub message: String,
    pub code: u16,
}

impl ApiError {
    pub fn is_stale_session(&self) -> bool {
        self.code == STALE_SESSION_CODE
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("backend error: {0}")]
    Api(ApiError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("undecodable response body (status {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// The backend error, if the request got as far as a typed error response.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_stale_session(&self) -> bool {
        self.api().is_some_and(ApiError::is_stale_session)
    }
}
