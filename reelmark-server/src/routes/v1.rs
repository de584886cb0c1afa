use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::handlers::player_status::{list_statuses_handler, record_status_handler};
use crate::infra::app_state::AppState;
use crate::users::{
    auth::middleware::{auth_middleware, require_path_owner},
    bookmark_handlers::{
        delete_bookmark_handler, list_bookmarks_handler, save_bookmark_handler,
    },
    progress_handlers::{
        cleanup_progress_handler, delete_progress_handler, list_progress_handler,
        update_progress_handler,
    },
    settings_handlers::{get_settings_handler, update_settings_handler},
    watch_history_handlers::{
        delete_watch_history_handler, list_watch_history_handler,
        update_watch_history_handler,
    },
};

pub fn create_v1_router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(create_user_routes(state.clone()))
        .merge(create_player_routes(state))
}

/// Routes scoped to `/users/{id}`. The session user must own the path.
fn create_user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users/{id}/progress", get(list_progress_handler))
        // Static segment wins over `{tmdbId}`.
        .route(
            "/users/{id}/progress/cleanup",
            delete(cleanup_progress_handler),
        )
        .route(
            "/users/{id}/progress/{tmdbId}",
            delete(delete_progress_handler).put(update_progress_handler),
        )
        .route("/users/{id}/watch-history", get(list_watch_history_handler))
        .route(
            "/users/{id}/watch-history/{tmdbId}",
            delete(delete_watch_history_handler).put(update_watch_history_handler),
        )
        .route("/users/{id}/bookmarks", get(list_bookmarks_handler))
        .route(
            "/users/{id}/bookmarks/{tmdbId}",
            post(save_bookmark_handler).delete(delete_bookmark_handler),
        )
        .route(
            "/users/{id}/settings",
            get(get_settings_handler).put(update_settings_handler),
        )
        // Last added runs first: authenticate, then check ownership.
        .route_layer(middleware::from_fn(require_path_owner))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn create_player_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/player/status",
            post(record_status_handler).get(list_statuses_handler),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
