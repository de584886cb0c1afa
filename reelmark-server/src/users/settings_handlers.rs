use axum::{
    Json,
    extract::{Path, State},
};
use reelmark_core::domain::ids::UserId;
use reelmark_core::domain::settings::SettingsPatch;

use super::responses::SettingsResponse;
use crate::infra::app_state::AppState;
use crate::infra::errors::AppResult;
use crate::infra::extract::AppJson;

/// Stored preferences, or defaults when the user never saved any.
pub async fn get_settings_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<SettingsResponse>> {
    let id = UserId::new(user_id);
    let settings = state.settings.get(&id).await?;
    Ok(Json(SettingsResponse { id, settings }))
}

/// Partial update. Omitted fields keep their stored value.
pub async fn update_settings_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    AppJson(patch): AppJson<SettingsPatch>,
) -> AppResult<Json<SettingsResponse>> {
    let id = UserId::new(user_id);
    let settings = state.settings.update(&id, patch).await?;
    Ok(Json(SettingsResponse { id, settings }))
}
