use axum::{extract::State, routing::get, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use naff_backend::Transport;
use naff_types::{AdminPage, ParticipantPage};

use crate::loader::{load_admin, load_participant, LoadExit};
use crate::middleware::auth::{session_token, AppState};

pub fn routes<T: Transport>(_state: AppState<T>) -> Router<AppState<T>> {
    Router::new()
        .route("/api/v1/participate", get(get_participant_page::<T>))
        .route("/api/v1/admin", get(get_admin_page::<T>))
}

async fn get_participant_page<T: Transport>(
    State(state): State<AppState<T>>,
    jar: CookieJar,
) -> Result<Json<ParticipantPage>, LoadExit> {
    let token = session_token(&jar);
    load_participant(&state.client, token.as_ref()).await.map(Json)
}

async fn get_admin_page<T: Transport>(
    State(state): State<AppState<T>>,
    jar: CookieJar,
) -> Result<Json<AdminPage>, LoadExit> {
    let token = session_token(&jar);
    load_admin(&state.client, token.as_ref()).await.map(Json)
}
