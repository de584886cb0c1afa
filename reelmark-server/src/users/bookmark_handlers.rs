use axum::{
    Json,
    extract::{Path, State},
};
use reelmark_core::domain::bookmark::BookmarkRequest;
use reelmark_core::domain::ids::{TmdbId, UserId};

use super::responses::{BookmarkRemoved, BookmarkResponse, Success};
use crate::infra::app_state::AppState;
use crate::infra::errors::AppResult;
use crate::infra::extract::AppJson;

pub async fn save_bookmark_handler(
    State(state): State<AppState>,
    Path((user_id, tmdb_id)): Path<(String, String)>,
    AppJson(request): AppJson<BookmarkRequest>,
) -> AppResult<Json<BookmarkResponse>> {
    let update = request.validate()?;
    let bookmark = state
        .bookmarks
        .save(UserId::new(user_id), TmdbId::new(tmdb_id), update)
        .await?;
    Ok(Json(bookmark.into()))
}

pub async fn list_bookmarks_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<BookmarkResponse>>> {
    let bookmarks = state.bookmarks.list(&UserId::new(user_id)).await?;
    Ok(Json(bookmarks.into_iter().map(Into::into).collect()))
}

/// Succeeds whether or not the bookmark existed.
pub async fn delete_bookmark_handler(
    State(state): State<AppState>,
    Path((user_id, tmdb_id)): Path<(String, String)>,
) -> AppResult<Json<Success<BookmarkRemoved>>> {
    let tmdb_id = TmdbId::new(tmdb_id);
    state
        .bookmarks
        .remove(&UserId::new(user_id), &tmdb_id)
        .await?;
    Ok(Json(Success::new(BookmarkRemoved { tmdb_id })))
}
