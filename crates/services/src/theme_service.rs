use std::sync::Arc;

use quiz_core::model::{Theme, ThemePreference};
use storage::repository::PreferenceRepository;

use crate::error::ThemeServiceError;

/// Reads and writes the persisted UI theme.
#[derive(Clone)]
pub struct ThemeService {
    repo: Arc<dyn PreferenceRepository>,
}

impl ThemeService {
    #[must_use]
    pub fn new(repo: Arc<dyn PreferenceRepository>) -> Self {
        Self { repo }
    }

    /// Resolve the starting theme: the stored choice, else `system_default`.
    ///
    /// # Errors
    ///
    /// Returns `ThemeServiceError` on storage failures.
    pub async fn init(&self, system_default: Theme) -> Result<ThemePreference, ThemeServiceError> {
        let persisted = self.repo.get_theme().await?;
        let preference = ThemePreference::resolve(persisted, system_default);
        tracing::debug!(theme = %preference.theme(), source = ?preference.source(), "theme resolved");
        Ok(preference)
    }

    /// Persist `theme` and return it as the active preference.
    ///
    /// # Errors
    ///
    /// Returns `ThemeServiceError` if the write fails.
    pub async fn set(&self, theme: Theme) -> Result<ThemePreference, ThemeServiceError> {
        self.repo.save_theme(theme).await?;
        tracing::info!(theme = %theme, "theme saved");
        Ok(ThemePreference::persisted(theme))
    }

    /// Flip `current` and write the result through.
    ///
    /// # Errors
    ///
    /// Returns `ThemeServiceError` if the write fails.
    pub async fn toggle(
        &self,
        current: ThemePreference,
    ) -> Result<ThemePreference, ThemeServiceError> {
        self.set(current.theme().toggled()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::ThemeSource;
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn init_falls_back_to_system_default() {
        let service = ThemeService::new(Arc::new(InMemoryRepository::new()));
        let pref = service.init(Theme::Dark).await.unwrap();
        assert_eq!(pref.theme(), Theme::Dark);
        assert_eq!(pref.source(), ThemeSource::SystemDefault);
    }

    #[tokio::test]
    async fn toggle_writes_through() {
        let repo = InMemoryRepository::new();
        let service = ThemeService::new(Arc::new(repo.clone()));

        let pref = service.init(Theme::Light).await.unwrap();
        let toggled = service.toggle(pref).await.unwrap();
        assert_eq!(toggled.theme(), Theme::Dark);
        assert_eq!(repo.get_theme().await.unwrap(), Some(Theme::Dark));

        let reloaded = service.init(Theme::Light).await.unwrap();
        assert_eq!(reloaded.theme(), Theme::Dark);
        assert_eq!(reloaded.source(), ThemeSource::Persisted);
    }
}
