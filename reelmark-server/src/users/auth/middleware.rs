use std::collections::HashMap;

use axum::{
    extract::{Path, Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use reelmark_core::domain::session::{SessionUser, hash_token};
use tracing::debug;

use crate::infra::app_state::AppState;
use crate::infra::errors::AppError;

/// Resolves the bearer token to a [`SessionUser`] request extension.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request)?;
    let session = state
        .unit_of_work
        .sessions
        .find_by_token_hash(&hash_token(&token))
        .await?
        .filter(|session| session.is_active(state.clock.now()))
        .ok_or_else(|| AppError::unauthorized("Invalid or expired session"))?;

    request.extensions_mut().insert(SessionUser {
        session_id: session.id,
        user_id: session.user_id,
    });
    Ok(next.run(request).await)
}

/// Rejects requests whose `{id}` path segment is not the session user.
/// Must run after [`auth_middleware`].
pub async fn require_path_owner(
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = request
        .extensions()
        .get::<SessionUser>()
        .map(|session| session.user_id.clone())
        .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    if params.get("id").map(String::as_str) != Some(user_id.as_str()) {
        debug!(%user_id, "Path owner mismatch");
        return Err(AppError::forbidden("Cannot access other user's data"));
    }
    Ok(next.run(request).await)
}

fn extract_bearer_token(request: &Request) -> Result<String, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| AppError::unauthorized("Expected a bearer token"))
}
