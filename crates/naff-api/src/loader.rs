//! Per-route page loaders.
//!
//! A loader turns the caller's token into the data a page renders, or into
//! the exit the request must take instead: a 307 to the backend's login or
//! logout endpoint, a 307 to the page matching the user's role, or a 500
//! carrying only [`INTERNAL_ERROR_MESSAGE`]. Calls are made strictly in
//! sequence (user, then team, then members) and any failure aborts the load.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
};
use naff_backend::{BackendClient, ClientError, Transport};
use naff_types::{backend_auth_url, AdminPage, AuthEndpoint, BearerToken, ParticipantPage};
use serde::Serialize;
use tracing::{error, info};

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";
pub const PARTICIPANT_PATH: &str = "/participate";
pub const ADMIN_PATH: &str = "/admin";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadExit {
    /// Temporary (307) redirect to the given location.
    Redirect(String),
    /// Generic 500; the underlying cause has already been logged.
    ServerError,
}

impl LoadExit {
    pub fn login<T: Transport>(client: &BackendClient<T>) -> Self {
        LoadExit::Redirect(backend_auth_url(client.base_url(), AuthEndpoint::Login))
    }

    pub fn logout<T: Transport>(client: &BackendClient<T>) -> Self {
        LoadExit::Redirect(backend_auth_url(client.base_url(), AuthEndpoint::Logout))
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            LoadExit::Redirect(location) => Some(location),
            LoadExit::ServerError => None,
        }
    }

    fn from_client_error<T: Transport>(
        client: &BackendClient<T>,
        stage: &'static str,
        e: ClientError,
    ) -> Self {
        if e.is_stale_session() {
            info!(stage, "backend rejected session, forcing re-authentication");
            return LoadExit::logout(client);
        }
        error!(stage, "page load failed: {e}");
        LoadExit::ServerError
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    message: &'static str,
}

impl IntoResponse for LoadExit {
    fn into_response(self) -> Response {
        match self {
            LoadExit::Redirect(location) => Redirect::temporary(&location).into_response(),
            LoadExit::ServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    message: INTERNAL_ERROR_MESSAGE,
                }),
            )
                .into_response(),
        }
    }
}

/// Loads the participant page: the user, their team if they have one, and
/// that team's members. Admins are sent to [`ADMIN_PATH`].
///
/// A backend error while fetching the team (other than a stale session) is
/// read as "not in a team" rather than a failure.
pub async fn load_participant<T: Transport>(
    client: &BackendClient<T>,
    token: Option<&BearerToken>,
) -> Result<ParticipantPage, LoadExit> {
    let Some(token) = token else {
        return Err(LoadExit::login(client));
    };

    let user = client
        .get_user(token)
        .await
        .map_err(|e| LoadExit::from_client_error(client, "user", e))?;

    if user.is_admin {
        return Err(LoadExit::Redirect(ADMIN_PATH.into()));
    }

    let team = match client.get_team(token).await {
        Ok(team) => team,
        Err(ClientError::Api(e)) if !e.is_stale_session() => {
            info!(user = %user.id, code = e.code, "no team for user: {}", e.message);
            None
        }
        Err(e) => return Err(LoadExit::from_client_error(client, "team", e)),
    };

    let members = match &team {
        Some(team) => Some(
            client
                .get_members(token, &team.id)
                .await
                .map_err(|e| LoadExit::from_client_error(client, "members", e))?,
        ),
        None => None,
    };

    Ok(ParticipantPage {
        user,
        team,
        members,
    })
}

/// Loads the admin page: the user and every team. Non-admins are sent to
/// [`PARTICIPANT_PATH`] before any team is fetched.
pub async fn load_admin<T: Transport>(
    client: &BackendClient<T>,
    token: Option<&BearerToken>,
) -> Result<AdminPage, LoadExit> {
    let Some(token) = token else {
        return Err(LoadExit::login(client));
    };

    let user = client
        .get_user(token)
        .await
        .map_err(|e| LoadExit::from_client_error(client, "user", e))?;

    if !user.is_admin {
        return Err(LoadExit::Redirect(PARTICIPANT_PATH.into()));
    }

    let teams = client
        .list_teams(token)
        .await
        .map_err(|e| LoadExit::from_client_error(client, "teams", e))?;

    Ok(AdminPage { user, teams })
}
