use std::sync::Arc;

use tracing::info;

use crate::database::ports::settings::SettingsRepository;
use crate::domain::ids::UserId;
use crate::domain::settings::{SettingsPatch, UserSettings};
use crate::error::Result;

#[derive(Clone)]
pub struct SettingsService {
    settings: Arc<dyn SettingsRepository>,
}

impl std::fmt::Debug for SettingsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsService").finish_non_exhaustive()
    }
}

impl SettingsService {
    pub fn new(settings: Arc<dyn SettingsRepository>) -> Self {
        Self { settings }
    }

    /// Stored settings, or defaults for a user who never saved any.
    pub async fn get(&self, user_id: &UserId) -> Result<UserSettings> {
        Ok(self.settings.get(user_id).await?.unwrap_or_default())
    }

    pub async fn update(
        &self,
        user_id: &UserId,
        patch: SettingsPatch,
    ) -> Result<UserSettings> {
        let current = self.get(user_id).await?;
        let updated = patch.apply(&current)?;
        let saved = self.settings.save(user_id, &updated).await?;
        info!(%user_id, "User settings updated");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::InMemorySettingsRepository;
    use crate::error::CoreError;
    use serde_json::json;

    fn patch(body: serde_json::Value) -> SettingsPatch {
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn first_update_starts_from_defaults() {
        let service =
            SettingsService::new(Arc::new(InMemorySettingsRepository::new()));
        let user = UserId::new("u");

        let saved = service
            .update(&user, patch(json!({ "applicationTheme": "mint" })))
            .await
            .unwrap();

        assert_eq!(saved.application_theme.as_deref(), Some("mint"));
        assert!(saved.enable_autoplay);
        assert_eq!(service.get(&user).await.unwrap(), saved);
    }

    #[tokio::test]
    async fn invalid_patch_leaves_store_untouched() {
        let service =
            SettingsService::new(Arc::new(InMemorySettingsRepository::new()));
        let user = UserId::new("u");

        let err = service
            .update(
                &user,
                patch(json!({ "applicationTheme": "mint", "enableAutoplay": null })),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(service.get(&user).await.unwrap(), UserSettings::default());
    }
}
