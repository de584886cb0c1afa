use axum::{
    Extension, Json,
    extract::{Query, State, rejection::QueryRejection},
};
use reelmark_core::domain::session::SessionUser;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::infra::app_state::AppState;
use crate::infra::errors::{AppError, AppResult};
use crate::infra::extract::AppJson;
use crate::infra::player_status::PlayerStatus;

#[derive(Debug, Serialize)]
pub struct RecordStatusResponse {
    pub success: bool,
    pub timestamp: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    pub user_id: String,
    pub room_code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusListResponse {
    pub user_id: String,
    pub room_code: String,
    pub statuses: Vec<PlayerStatus>,
}

/// Stores a player snapshot for the calling user.
pub async fn record_status_handler(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    AppJson(status): AppJson<PlayerStatus>,
) -> AppResult<Json<RecordStatusResponse>> {
    if status.user_id != session.user_id.as_str() {
        return Err(AppError::forbidden("Cannot report status for another user"));
    }
    if status.room_code.trim().is_empty() {
        return Err(AppError::bad_request("roomCode must not be empty"));
    }

    let timestamp = state.player_status.record(status);
    debug!(user_id = %session.user_id, timestamp, "Player status recorded");
    Ok(Json(RecordStatusResponse {
        success: true,
        timestamp,
    }))
}

/// Unexpired snapshots for one member of a room. Any authenticated user may
/// read them.
pub async fn list_statuses_handler(
    State(state): State<AppState>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> AppResult<Json<StatusListResponse>> {
    let Query(query) =
        query.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let statuses = state
        .player_status
        .statuses(&query.user_id, &query.room_code);
    Ok(Json(StatusListResponse {
        user_id: query.user_id,
        room_code: query.room_code,
        statuses,
    }))
}
