//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;

/// Errors emitted while starting a quiz session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("subject `{0}` not found")]
    SubjectNotFound(String),
    #[error("topic `{topic}` not found in subject `{subject}`")]
    TopicNotFound { subject: String, topic: String },
    #[error("no questions available for session")]
    Empty,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// True for the "nothing to show" family the UI renders as an empty state.
    #[must_use]
    pub fn is_empty_state(&self) -> bool {
        matches!(
            self,
            Self::SubjectNotFound(_) | Self::TopicNotFound { .. } | Self::Empty
        )
    }
}

/// Errors emitted by `ThemeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ThemeServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
