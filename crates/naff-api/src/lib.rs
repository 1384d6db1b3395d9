#![allow(non_snake_case)]

pub mod config;
pub mod loader;
pub mod middleware;
pub mod routes;

use axum::Router;
use naff_backend::{BackendClient, ReqwestTransport, Transport, TransportError};

use crate::config::Config;
use crate::middleware::auth::AppState;

pub fn api_router<T: Transport>(state: AppState<T>) -> Router {
    let apiRoutes = routes::api_routes(state.clone());

    Router::new().merge(apiRoutes).with_state(state)
}

impl AppState<ReqwestTransport> {
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(config.backend.timeout())?;
        Ok(Self {
            client: BackendClient::new(
                config.backend.url.clone(),
                transport,
                config.backend.retry_policy(),
            ),
            identity: config.identity.clone(),
        })
    }
}
