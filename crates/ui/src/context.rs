use std::sync::Arc;

use quiz_core::model::{Theme, ThemePreference};
use services::{QuizService, ThemeService};

use crate::views::ViewError;
use crate::vm::AutoAdvancePolicy;

pub trait UiApp: Send + Sync {
    fn quiz_service(&self) -> Arc<QuizService>;
    fn theme_service(&self) -> Arc<ThemeService>;
    fn auto_advance(&self) -> AutoAdvancePolicy;
}

/// Services and presentation settings handed to every screen.
///
/// The theme lives here as a plain value; changing it goes through
/// [`AppContext::set_theme`] so the stored preference stays in sync.
#[derive(Clone)]
pub struct AppContext {
    quiz: Arc<QuizService>,
    themes: Arc<ThemeService>,
    auto_advance: AutoAdvancePolicy,
    theme: ThemePreference,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>, theme: ThemePreference) -> Self {
        Self {
            quiz: app.quiz_service(),
            themes: app.theme_service(),
            auto_advance: app.auto_advance(),
            theme,
        }
    }

    #[must_use]
    pub fn quiz_service(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn auto_advance(&self) -> AutoAdvancePolicy {
        self.auto_advance
    }

    #[must_use]
    pub fn theme(&self) -> ThemePreference {
        self.theme
    }

    /// Persist `theme` and make it active.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the preference cannot be saved; the
    /// active theme is left unchanged.
    pub async fn set_theme(&mut self, theme: Theme) -> Result<ThemePreference, ViewError> {
        self.theme = self.themes.set(theme).await.map_err(|err| {
            tracing::warn!(error = %err, "theme not saved");
            ViewError::Unknown
        })?;
        Ok(self.theme)
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the preference cannot be saved.
    pub async fn toggle_theme(&mut self) -> Result<ThemePreference, ViewError> {
        self.set_theme(self.theme.theme().toggled()).await
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Resolve the starting theme and build the context.
///
/// # Errors
///
/// Returns `ViewError::Unknown` if the stored preference cannot be read.
pub async fn build_app_context(
    app: &Arc<dyn UiApp>,
    system_theme: Theme,
) -> Result<AppContext, ViewError> {
    let theme = app.theme_service().init(system_theme).await.map_err(|err| {
        tracing::warn!(error = %err, "theme preference unavailable");
        ViewError::Unknown
    })?;
    Ok(AppContext::new(app, theme))
}
