//! JSON question catalog.
//!
//! The catalog is a static data file:
//!
//! ```json
//! { "subjects": [ { "key": "biology", "name": "Biology", "topics": [
//!     { "name": "Cells", "questions": [
//!         { "question": "…", "answers": ["…"], "correct": 1 },
//!         { "question": "…", "type": "fill_blank", "correct": "Golgi" }
//!     ] } ] } ] }
//! ```
//!
//! Records are validated into domain `Question`s while loading, so a catalog
//! that loads is always gradeable.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use quiz_core::model::{Question, QuestionError, QuestionKind, QuestionType, Subject, Topic};

use crate::repository::InMemoryRepository;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// A single question record that cannot be turned into a `Question`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecordError {
    #[error("missing answer key for a {0} question")]
    MissingKey(&'static str),

    #[error("answer key does not fit a {0} question")]
    MismatchedKey(&'static str),

    #[error(transparent)]
    Invalid(#[from] QuestionError),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("cannot read catalog {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("subject `{subject}`, topic `{topic}`, question {number}: {source}")]
    InvalidQuestion {
        subject: String,
        topic: String,
        number: usize,
        source: RecordError,
    },

    #[error("subject key `{0}` appears more than once")]
    DuplicateSubject(String),
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    pub subjects: Vec<SubjectRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubjectRecord {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub topics: Vec<TopicRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicRecord {
    pub name: String,
    #[serde(default)]
    pub questions: Vec<QuestionRecord>,
}

/// Answer key as written in the catalog; its shape depends on the question type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CorrectRecord {
    Index(usize),
    Indices(Vec<usize>),
    Text(String),
    Pairs(BTreeMap<String, String>),
}

/// Persisted shape of a question.
///
/// Mirrors the loosely typed catalog layout so the domain `Question` stays a
/// tagged union.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    #[serde(alias = "question")]
    pub text: String,
    #[serde(rename = "type", default)]
    pub question_type: QuestionType,
    #[serde(default)]
    pub answers: Vec<String>,
    #[serde(default)]
    pub correct: Option<CorrectRecord>,
    #[serde(default)]
    pub correct_sequence: Option<Vec<usize>>,
    #[serde(default)]
    pub left_items: Vec<String>,
    #[serde(default)]
    pub right_items: Vec<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl QuestionRecord {
    /// Convert the record into a validated domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `RecordError` if the answer key is missing, has the wrong shape
    /// for the declared type, or fails `Question` validation.
    pub fn into_question(self) -> Result<Question, RecordError> {
        let type_name = self.question_type.as_str();
        let kind = match (self.question_type, self.correct) {
            (QuestionType::Sequence, _) => QuestionKind::Sequence {
                correct_sequence: self
                    .correct_sequence
                    .ok_or(RecordError::MissingKey(type_name))?,
            },
            (_, None) => return Err(RecordError::MissingKey(type_name)),
            (QuestionType::Single, Some(CorrectRecord::Index(correct))) => {
                QuestionKind::Single { correct }
            }
            (QuestionType::Multiple, Some(CorrectRecord::Indices(correct))) => {
                QuestionKind::Multiple { correct }
            }
            (QuestionType::FillBlank, Some(CorrectRecord::Text(correct))) => {
                QuestionKind::FillBlank { correct }
            }
            (QuestionType::Matching, Some(CorrectRecord::Pairs(correct))) => {
                QuestionKind::Matching {
                    left_items: self.left_items,
                    right_items: self.right_items,
                    correct,
                }
            }
            (_, Some(_)) => return Err(RecordError::MismatchedKey(type_name)),
        };

        Ok(Question::new(self.text, self.answers, kind, self.explanation)?)
    }
}

impl SubjectRecord {
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidQuestion` naming the first bad record.
    pub fn into_subject(self) -> Result<Subject, CatalogError> {
        let mut topics = Vec::with_capacity(self.topics.len());
        for topic in self.topics {
            let mut questions = Vec::with_capacity(topic.questions.len());
            for (index, record) in topic.questions.into_iter().enumerate() {
                let question =
                    record
                        .into_question()
                        .map_err(|source| CatalogError::InvalidQuestion {
                            subject: self.key.clone(),
                            topic: topic.name.clone(),
                            number: index + 1,
                            source,
                        })?;
                questions.push(question);
            }
            topics.push(Topic::new(topic.name, questions));
        }

        let mut subject = Subject::new(self.key, self.name, topics);
        subject.description = self.description.filter(|d| !d.trim().is_empty());
        Ok(subject)
    }
}

//
// ─── LOADING ───────────────────────────────────────────────────────────────────
//

/// Parse and validate a catalog document.
///
/// # Errors
///
/// Returns `CatalogError` for malformed JSON, duplicate subject keys, or
/// invalid question records.
pub fn parse_catalog(json: &str) -> Result<Vec<Subject>, CatalogError> {
    let file: CatalogFile = serde_json::from_str(json)?;

    let mut seen = HashSet::new();
    let mut subjects = Vec::with_capacity(file.subjects.len());
    for record in file.subjects {
        if !seen.insert(record.key.clone()) {
            return Err(CatalogError::DuplicateSubject(record.key));
        }
        subjects.push(record.into_subject()?);
    }
    Ok(subjects)
}

/// Read a catalog file from disk.
///
/// # Errors
///
/// Returns `CatalogError::Io` if the file cannot be read, or any parse error.
pub async fn load_catalog(path: &Path) -> Result<Vec<Subject>, CatalogError> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let subjects = parse_catalog(&json)?;
    tracing::info!(
        path = %path.display(),
        subjects = subjects.len(),
        "question catalog loaded"
    );
    Ok(subjects)
}

impl InMemoryRepository {
    /// Build a repository from a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the catalog cannot be loaded.
    pub async fn from_catalog_file(path: &Path) -> Result<Self, CatalogError> {
        Ok(Self::with_subjects(load_catalog(path).await?))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
