#![allow(non_snake_case)]

pub mod client;
pub mod error;
pub mod retry;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;

pub use client::BackendClient;
pub use error::{ApiError, ClientError, STALE_SESSION_CODE};
pub use retry::RetryPolicy;
pub use transport::{BackendRequest, BackendResponse, ReqwestTransport, Transport, TransportError};
