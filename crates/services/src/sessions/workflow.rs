use std::sync::Arc;

use quiz_core::model::{Subject, SubjectSummary, TopicSelector};
use storage::repository::QuestionRepository;

use super::service::{QuizSession, SessionConfig};
use crate::Clock;
use crate::error::SessionError;

/// Resolves catalog selections into running quiz sessions.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    questions: Arc<dyn QuestionRepository>,
    config: SessionConfig,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, questions: Arc<dyn QuestionRepository>) -> Self {
        Self {
            clock,
            questions,
            config: SessionConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// All subjects in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the catalog cannot be read.
    pub async fn list_subjects(&self) -> Result<Vec<SubjectSummary>, SessionError> {
        Ok(self.questions.list_subjects().await?)
    }

    /// Fetch one subject with its topics.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SubjectNotFound` for an unknown key, or
    /// `SessionError::Storage` on read failures.
    pub async fn subject(&self, subject_key: &str) -> Result<Subject, SessionError> {
        self.questions
            .lookup(subject_key)
            .await?
            .ok_or_else(|| SessionError::SubjectNotFound(subject_key.to_owned()))
    }

    /// Start a quiz over one topic or over every topic of a subject.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SubjectNotFound` or `SessionError::TopicNotFound`
    /// for unknown selections, `SessionError::Empty` when the selection has no
    /// questions, and `SessionError::Storage` on read failures.
    pub async fn start_quiz(
        &self,
        subject_key: &str,
        selector: &TopicSelector,
    ) -> Result<QuizSession, SessionError> {
        let subject = self.subject(subject_key).await?;
        let questions =
            subject
                .resolve_questions(selector)
                .ok_or_else(|| SessionError::TopicNotFound {
                    subject: subject_key.to_owned(),
                    topic: selector.to_string(),
                })?;

        tracing::info!(
            subject = subject_key,
            topic = %selector,
            questions = questions.len(),
            "starting quiz"
        );
        QuizSession::load(questions, self.config, self.clock)
    }
}
