use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    routing::patch,
    Json, Router,
};
use mongli_common::RenameRequest;

use crate::auth::bearer_token;
use crate::error::SessionError;
use crate::AppState;

/// PATCH /user/name - change the caller's display name
async fn rename(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<RenameRequest>, JsonRejection>,
) -> Result<StatusCode, SessionError> {
    let access_token = bearer_token(&headers)?;
    let Json(request) = payload.map_err(|e| SessionError::BadRequest(e.body_text()))?;

    state.sessions.rename(access_token, &request.name).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/user/name", patch(rename))
        .with_state(state)
}
