use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::repository::{PreferenceRepository, StorageError};
use quiz_core::model::Theme;

use super::SqliteRepository;

#[async_trait]
impl PreferenceRepository for SqliteRepository {
    async fn get_theme(&self) -> Result<Option<Theme>, StorageError> {
        let row = sqlx::query("SELECT theme FROM ui_preferences WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let raw: String = row
            .try_get("theme")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        raw.parse::<Theme>()
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn save_theme(&self, theme: Theme) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO ui_preferences (id, theme, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                theme = excluded.theme,
                updated_at = excluded.updated_at
            ",
        )
        .bind(1_i64)
        .bind(theme.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        tracing::debug!(%theme, "theme preference saved");
        Ok(())
    }
}
