use async_trait::async_trait;

use crate::domain::ids::UserId;
use crate::domain::settings::UserSettings;
use crate::error::Result;

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self, user_id: &UserId) -> Result<Option<UserSettings>>;

    async fn save(
        &self,
        user_id: &UserId,
        settings: &UserSettings,
    ) -> Result<UserSettings>;
}
