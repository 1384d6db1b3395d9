//! Server-side plumbing shared by the server functions.

use http::{request::Parts, StatusCode};
use leptos::prelude::*;
use leptos_axum::ResponseOptions;
use naff_api::loader::{LoadExit, INTERNAL_ERROR_MESSAGE};
use naff_api::middleware::auth::{session_token_from_headers, AppState};
use naff_backend::ClientError;
use naff_types::BearerToken;

pub fn app_state() -> Result<AppState, ServerFnError> {
    use_context::<AppState>().ok_or_else(|| ServerFnError::new("backend context unavailable"))
}

pub fn request_token() -> Option<BearerToken> {
    use_context::<Parts>().and_then(|parts| session_token_from_headers(&parts.headers))
}

/// Page data already loaded by the page middleware for this request, if any.
pub fn preloaded<T: Clone + Send + Sync + 'static>() -> Option<T> {
    use_context::<Parts>().and_then(|parts| parts.extensions.get::<T>().cloned())
}

/// Applies a loader exit to the current response and returns the error the
/// server function should report.
pub fn exit(exit: LoadExit) -> ServerFnError {
    match exit {
        LoadExit::Redirect(location) => {
            leptos_axum::redirect(&location);
            ServerFnError::new(format!("redirected to {location}"))
        }
        LoadExit::ServerError => {
            if let Some(response) = use_context::<ResponseOptions>() {
                response.set_status(StatusCode::INTERNAL_SERVER_ERROR);
            }
            ServerFnError::new(INTERNAL_ERROR_MESSAGE)
        }
    }
}

pub fn require_token(state: &AppState) -> Result<BearerToken, ServerFnError> {
    request_token().ok_or_else(|| exit(LoadExit::login(&state.client)))
}

/// Maps a failed team action. Backend messages are written for end users and
/// are passed through; anything else is reported generically.
pub fn action_error(state: &AppState, action: &'static str, e: ClientError) -> ServerFnError {
    if e.is_stale_session() {
        return exit(LoadExit::logout(&state.client));
    }
    match e {
        ClientError::Api(api) => {
            tracing::info!(action, code = api.code, "team action rejected: {}", api.message);
            ServerFnError::new(api.message)
        }
        other => {
            tracing::error!(action, "team action failed: {other}");
            exit(LoadExit::ServerError)
        }
    }
}
