//! Sign-in and token endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, post},
    Json, Router,
};
use mongli_common::{AccessTokenResponse, AuthRequest, TokenPair};

use crate::auth::bearer_token;
use crate::error::SessionError;
use crate::session::SignInOutcome;
use crate::AppState;

/// POST /signin - sign up (with display name) or sign in (without)
async fn sign_in(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenPair>), SessionError> {
    let Json(request) = payload.map_err(|e| SessionError::BadRequest(e.body_text()))?;

    let outcome = state.sessions.sign_in(&request).await?;
    let status = match outcome {
        SignInOutcome::Created(_) => StatusCode::CREATED,
        SignInOutcome::Resumed(_) => StatusCode::OK,
    };

    Ok((status, Json(outcome.into_tokens())))
}

/// POST /token/renew - exchange a refresh token for a new access token
async fn renew(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<AccessTokenResponse>), SessionError> {
    let refresh_token = bearer_token(&headers)?;
    let response = state.sessions.renew(refresh_token).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// DELETE /token - end the caller's session
async fn revoke(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, SessionError> {
    let refresh_token = bearer_token(&headers)?;
    state.sessions.revoke(refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/signin", post(sign_in))
        .route("/token/renew", post(renew))
        .route("/token", delete(revoke))
        .with_state(state)
}
