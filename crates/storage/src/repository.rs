use async_trait::async_trait;
use quiz_core::model::{Subject, SubjectSummary, Theme};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Read-only access to the subject → topic → question catalog.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Fetch a subject with all of its topics.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read. A missing subject
    /// is `Ok(None)`.
    async fn lookup(&self, subject_key: &str) -> Result<Option<Subject>, StorageError>;

    /// List every subject in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn list_subjects(&self) -> Result<Vec<SubjectSummary>, StorageError>;
}

/// Persistence for presentation preferences.
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    /// Stored theme, if the user ever chose one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the preference cannot be read.
    async fn get_theme(&self) -> Result<Option<Theme>, StorageError>;

    /// Persist the chosen theme.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the preference cannot be written.
    async fn save_theme(&self, theme: Theme) -> Result<(), StorageError>;
}

/// Simple in-memory repository for tests and for catalogs loaded from JSON.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    subjects: Arc<Mutex<Vec<Subject>>>,
    theme: Arc<Mutex<Option<Theme>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_subjects(subjects: Vec<Subject>) -> Self {
        Self {
            subjects: Arc::new(Mutex::new(subjects)),
            theme: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn lookup(&self, subject_key: &str) -> Result<Option<Subject>, StorageError> {
        let guard = self
            .subjects
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.iter().find(|s| s.key == subject_key).cloned())
    }

    async fn list_subjects(&self) -> Result<Vec<SubjectSummary>, StorageError> {
        let guard = self
            .subjects
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.iter().map(Subject::summary).collect())
    }
}

#[async_trait]
impl PreferenceRepository for InMemoryRepository {
    async fn get_theme(&self) -> Result<Option<Theme>, StorageError> {
        let guard = self
            .theme
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(*guard)
    }

    async fn save_theme(&self, theme: Theme) -> Result<(), StorageError> {
        let mut guard = self
            .theme
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(theme);
        Ok(())
    }
}

/// Repositories behind trait objects so backends can be swapped.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
    pub preferences: Arc<dyn PreferenceRepository>,
}

impl Storage {
    /// Catalog and preferences both held in memory.
    #[must_use]
    pub fn in_memory(subjects: Vec<Subject>) -> Self {
        let repo = InMemoryRepository::with_subjects(subjects);
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let preferences: Arc<dyn PreferenceRepository> = Arc::new(repo);
        Self {
            questions,
            preferences,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, Topic};

    fn subject(key: &str, questions: usize) -> Subject {
        let qs = (0..questions)
            .map(|i| Question::single(format!("Q{i}"), &["a", "b"], 0).unwrap())
            .collect();
        Subject::new(key, key.to_uppercase(), vec![Topic::new("Basics", qs)])
    }

    #[tokio::test]
    async fn lookup_finds_subject_by_key() {
        let repo = InMemoryRepository::with_subjects(vec![subject("bio", 2), subject("chem", 1)]);

        let found = repo.lookup("chem").await.unwrap().unwrap();
        assert_eq!(found.name, "CHEM");
        assert!(repo.lookup("physics").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn theme_is_unset_until_saved() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.get_theme().await.unwrap(), None);
        repo.save_theme(Theme::Dark).await.unwrap();
        assert_eq!(repo.get_theme().await.unwrap(), Some(Theme::Dark));
    }
}
