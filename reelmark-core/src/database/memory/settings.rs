use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::ports::settings::SettingsRepository;
use crate::domain::ids::UserId;
use crate::domain::settings::UserSettings;
use crate::error::Result;

#[derive(Debug, Default)]
pub struct InMemorySettingsRepository {
    settings: RwLock<HashMap<UserId, UserSettings>>,
}

impl InMemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn get(&self, user_id: &UserId) -> Result<Option<UserSettings>> {
        Ok(self.settings.read().await.get(user_id).cloned())
    }

    async fn save(
        &self,
        user_id: &UserId,
        settings: &UserSettings,
    ) -> Result<UserSettings> {
        self.settings
            .write()
            .await
            .insert(user_id.clone(), settings.clone());
        Ok(settings.clone())
    }
}
