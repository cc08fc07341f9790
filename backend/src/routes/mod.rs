pub mod health;
pub mod session;
pub mod user;

use std::sync::Arc;

use axum::Router;

use crate::AppState;

/// Build the full API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::router())
        .merge(session::router(state.clone()))
        .merge(user::router(state))
}
