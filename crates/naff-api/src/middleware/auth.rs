use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use naff_backend::{BackendClient, ReqwestTransport, Transport};
use naff_types::{BearerToken, IdentityConfig, ACCESS_TOKEN_COOKIE};

use crate::loader::{load_admin, load_participant, ADMIN_PATH, PARTICIPANT_PATH};

pub struct AppState<T = ReqwestTransport> {
    pub client: BackendClient<T>,
    pub identity: IdentityConfig,
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            identity: self.identity.clone(),
        }
    }
}

/// The caller's backend token from the `access_token` cookie. A missing or
/// empty cookie yields `None`.
pub fn session_token(jar: &CookieJar) -> Option<BearerToken> {
    jar.get(ACCESS_TOKEN_COOKIE)
        .and_then(|cookie| BearerToken::new(cookie.value()))
}

pub fn session_token_from_headers(headers: &HeaderMap) -> Option<BearerToken> {
    session_token(&CookieJar::from_headers(headers))
}

/// Middleware for page routes: runs the page's loader before rendering.
///
/// Redirects and failures become the response directly; loaded data is put in
/// the request extensions for the renderer to pick up.
pub async fn require_page_data<T: Transport>(
    State(state): State<AppState<T>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let token = session_token_from_headers(request.headers());

    match path.as_str() {
        PARTICIPANT_PATH => match load_participant(&state.client, token.as_ref()).await {
            Ok(page) => {
                request.extensions_mut().insert(page);
            }
            Err(exit) => return exit.into_response(),
        },
        ADMIN_PATH => match load_admin(&state.client, token.as_ref()).await {
            Ok(page) => {
                request.extensions_mut().insert(page);
            }
            Err(exit) => return exit.into_response(),
        },
        _ => {}
    }

    next.run(request).await
}
