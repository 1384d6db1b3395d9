pub mod pages;

use axum::Router;
use naff_backend::Transport;

use crate::middleware::auth::AppState;

pub fn api_routes<T: Transport>(state: AppState<T>) -> Router<AppState<T>> {
    Router::new().merge(pages::routes(state))
}
