use axum::{
    Json,
    extract::{Path, State},
};
use reelmark_core::domain::history::WatchHistoryRequest;
use reelmark_core::domain::ids::{TmdbId, UserId};
use reelmark_core::domain::keys::DeleteRequest;

use super::responses::{DeleteResponse, Success, WatchHistoryItemResponse};
use crate::infra::app_state::AppState;
use crate::infra::errors::AppResult;
use crate::infra::extract::{AppJson, OptionalJson};

pub async fn update_watch_history_handler(
    State(state): State<AppState>,
    Path((user_id, tmdb_id)): Path<(String, String)>,
    AppJson(request): AppJson<WatchHistoryRequest>,
) -> AppResult<Json<Success<WatchHistoryItemResponse>>> {
    let update = request.validate()?;
    let record = state
        .watch_history
        .record(UserId::new(user_id), TmdbId::new(tmdb_id), update)
        .await?;
    Ok(Json(Success::new(record.into())))
}

pub async fn list_watch_history_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<WatchHistoryItemResponse>>> {
    let records = state.watch_history.list(&UserId::new(user_id)).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

pub async fn delete_watch_history_handler(
    State(state): State<AppState>,
    Path((user_id, tmdb_id)): Path<(String, String)>,
    OptionalJson(request): OptionalJson<DeleteRequest>,
) -> AppResult<Json<Success<DeleteResponse>>> {
    let request = request.validate()?;
    let tmdb_id = TmdbId::new(tmdb_id);
    let filter = request.filter(UserId::new(user_id), tmdb_id.clone());

    let count = state.watch_history.delete(&filter).await?;
    Ok(Json(Success::new(DeleteResponse::new(count, tmdb_id, request))))
}
