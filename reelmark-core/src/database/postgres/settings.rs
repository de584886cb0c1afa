use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::database::ports::settings::SettingsRepository;
use crate::domain::ids::UserId;
use crate::domain::settings::UserSettings;
use crate::error::{CoreError, Result};

#[derive(Debug, Clone)]
pub struct PostgresSettingsRepository {
    pool: PgPool,
}

impl PostgresSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for PostgresSettingsRepository {
    async fn get(&self, user_id: &UserId) -> Result<Option<UserSettings>> {
        let document: Option<Json<UserSettings>> = sqlx::query_scalar(
            "SELECT settings FROM user_settings WHERE user_id = $1",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            CoreError::Internal(format!("Failed to load user settings: {e}"))
        })?;

        Ok(document.map(|Json(settings)| settings))
    }

    async fn save(
        &self,
        user_id: &UserId,
        settings: &UserSettings,
    ) -> Result<UserSettings> {
        let Json(stored): Json<UserSettings> = sqlx::query_scalar(
            r#"
            INSERT INTO user_settings (user_id, settings, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id) DO UPDATE SET
                settings = EXCLUDED.settings,
                updated_at = EXCLUDED.updated_at
            RETURNING settings
            "#,
        )
        .bind(user_id.as_str())
        .bind(Json(settings))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            CoreError::Internal(format!("Failed to save user settings: {e}"))
        })?;

        Ok(stored)
    }
}

#[cfg(all(test, feature = "postgres-tests"))]
mod tests {
    use super::*;

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    async fn save_then_get_round_trips_document(pool: PgPool) {
        let repo = PostgresSettingsRepository::new(pool);
        let user = UserId::new("u1");
        assert_eq!(repo.get(&user).await.unwrap(), None);

        let settings = UserSettings {
            application_theme: Some("blue".into()),
            source_order: vec!["a".into(), "b".into()],
            ..UserSettings::default()
        };
        repo.save(&user, &settings).await.unwrap();

        assert_eq!(repo.get(&user).await.unwrap(), Some(settings));
    }
}
