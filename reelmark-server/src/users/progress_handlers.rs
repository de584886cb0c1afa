use axum::{
    Json,
    extract::{Path, State},
};
use reelmark_core::ProgressOutcome;
use reelmark_core::domain::ids::{TmdbId, UserId};
use reelmark_core::domain::keys::DeleteRequest;
use reelmark_core::domain::progress::ProgressUpdateRequest;

use super::responses::{
    CleanupResponse, DeleteResponse, ProgressDisplay, ProgressItemResponse,
};
use crate::infra::app_state::AppState;
use crate::infra::errors::AppResult;
use crate::infra::extract::{AppJson, OptionalJson};

/// Records a playback position.
///
/// Positions that are not worth keeping (barely started or finished, with no
/// in-progress sibling episode in the same season) are echoed back with
/// `id: null` and nothing is written.
pub async fn update_progress_handler(
    State(state): State<AppState>,
    Path((user_id, tmdb_id)): Path<(String, String)>,
    AppJson(request): AppJson<ProgressUpdateRequest>,
) -> AppResult<Json<ProgressItemResponse>> {
    let update = request.validate()?;
    let outcome = state
        .progress
        .update(UserId::new(user_id), TmdbId::new(tmdb_id), update)
        .await?;

    Ok(Json(match outcome {
        ProgressOutcome::Persisted(record) => ProgressItemResponse::persisted(record),
        ProgressOutcome::Skipped(write) => ProgressItemResponse::skipped(write),
    }))
}

pub async fn list_progress_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<ProgressDisplay>>> {
    let records = state.progress.list(&UserId::new(user_id)).await?;
    Ok(Json(records.into_iter().map(ProgressDisplay::from).collect()))
}

/// Deletes progress for a title, narrowed by the optional body.
pub async fn delete_progress_handler(
    State(state): State<AppState>,
    Path((user_id, tmdb_id)): Path<(String, String)>,
    OptionalJson(request): OptionalJson<DeleteRequest>,
) -> AppResult<Json<DeleteResponse>> {
    let request = request.validate()?;
    let tmdb_id = TmdbId::new(tmdb_id);
    let filter = request.filter(UserId::new(user_id), tmdb_id.clone());

    let count = state.progress.delete(&filter).await?;
    Ok(Json(DeleteResponse::new(count, tmdb_id, request)))
}

pub async fn cleanup_progress_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<CleanupResponse>> {
    let deleted = state.progress.cleanup(&UserId::new(user_id)).await?;
    Ok(Json(CleanupResponse::new(deleted)))
}
