use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Reasons a question record cannot become a `Question`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("answer index {index} is out of range for {len} options")]
    AnswerOutOfRange { index: usize, len: usize },

    #[error("fill-in-the-blank answer cannot be empty")]
    EmptyBlank,

    #[error("answer index {0} is listed more than once")]
    DuplicateAnswer(usize),

    #[error("sequence must order every option exactly once")]
    InvalidSequence,

    #[error("matching key `{0}` is not one of the left items")]
    UnknownLeftItem(String),

    #[error("matching value `{0}` is not one of the right items")]
    UnknownRightItem(String),

    #[error("matching answer is missing left item `{0}`")]
    MissingLeftItem(String),
}

//
// ─── QUESTION TYPE ─────────────────────────────────────────────────────────────
//

/// Closed set of question types. `Single` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    #[default]
    Single,
    Multiple,
    FillBlank,
    Matching,
    Sequence,
}

impl QuestionType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multiple => "multiple",
            Self::FillBlank => "fill_blank",
            Self::Matching => "matching",
            Self::Sequence => "sequence",
        }
    }
}

//
// ─── QUESTION KIND ─────────────────────────────────────────────────────────────
//

/// Type-specific payload of a question, including its answer key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    /// Exactly one option is correct.
    Single { correct: usize },
    /// Any subset of options; order of selection is irrelevant.
    Multiple { correct: Vec<usize> },
    /// Free text compared without case or surrounding whitespace.
    FillBlank { correct: String },
    /// Every left item must be paired with its right item.
    Matching {
        left_items: Vec<String>,
        right_items: Vec<String>,
        correct: BTreeMap<String, String>,
    },
    /// Options must be placed in `correct_sequence` order.
    Sequence { correct_sequence: Vec<usize> },
}

impl QuestionKind {
    #[must_use]
    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::Single { .. } => QuestionType::Single,
            Self::Multiple { .. } => QuestionType::Multiple,
            Self::FillBlank { .. } => QuestionType::FillBlank,
            Self::Matching { .. } => QuestionType::Matching,
            Self::Sequence { .. } => QuestionType::Sequence,
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Immutable, validated quiz question.
///
/// `answers` holds the option labels. For `Single`, `Multiple` and `Sequence`
/// the answer key refers to positions in `answers`; matching questions carry
/// their own left/right columns and may leave `answers` empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    answers: Vec<String>,
    kind: QuestionKind,
    explanation: Option<String>,
}

impl Question {
    /// Build a question, checking that the answer key fits the options.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is blank or the answer key refers
    /// to options that do not exist.
    pub fn new(
        text: impl Into<String>,
        answers: Vec<String>,
        kind: QuestionKind,
        explanation: Option<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into().trim().to_owned();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }

        validate_kind(&kind, answers.len())?;

        let explanation = explanation
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        Ok(Self {
            text,
            answers,
            kind,
            explanation,
        })
    }

    /// Convenience constructor for the default single-choice question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if validation fails.
    pub fn single(
        text: impl Into<String>,
        answers: &[&str],
        correct: usize,
    ) -> Result<Self, QuestionError> {
        Self::new(
            text,
            answers.iter().map(|a| (*a).to_owned()).collect(),
            QuestionKind::Single { correct },
            None,
        )
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        let explanation = explanation.into().trim().to_owned();
        self.explanation = (!explanation.is_empty()).then_some(explanation);
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    /// Label of the option at `index`, if any.
    #[must_use]
    pub fn answer_label(&self, index: usize) -> Option<&str> {
        self.answers.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    #[must_use]
    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }
}

fn validate_kind(kind: &QuestionKind, options: usize) -> Result<(), QuestionError> {
    let in_range = |index: usize| {
        if index < options {
            Ok(())
        } else {
            Err(QuestionError::AnswerOutOfRange {
                index,
                len: options,
            })
        }
    };

    match kind {
        QuestionKind::Single { correct } => in_range(*correct),
        QuestionKind::Multiple { correct } => {
            let mut seen = BTreeSet::new();
            correct.iter().copied().try_for_each(|index| {
                in_range(index)?;
                if seen.insert(index) {
                    Ok(())
                } else {
                    Err(QuestionError::DuplicateAnswer(index))
                }
            })
        }
        QuestionKind::FillBlank { correct } => {
            if correct.trim().is_empty() {
                Err(QuestionError::EmptyBlank)
            } else {
                Ok(())
            }
        }
        QuestionKind::Sequence { correct_sequence } => {
            correct_sequence.iter().copied().try_for_each(in_range)?;
            let distinct: BTreeSet<_> = correct_sequence.iter().collect();
            if correct_sequence.len() != options || distinct.len() != options {
                return Err(QuestionError::InvalidSequence);
            }
            Ok(())
        }
        QuestionKind::Matching {
            left_items,
            right_items,
            correct,
        } => {
            for (left, right) in correct {
                if !left_items.contains(left) {
                    return Err(QuestionError::UnknownLeftItem(left.clone()));
                }
                if !right_items.contains(right) {
                    return Err(QuestionError::UnknownRightItem(right.clone()));
                }
            }
            if let Some(missing) = left_items.iter().find(|left| !correct.contains_key(*left)) {
                return Err(QuestionError::MissingLeftItem(missing.clone()));
            }
            Ok(())
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|l| (*l).to_owned()).collect()
    }

    #[test]
    fn blank_text_is_rejected() {
        let err = Question::single("   ", &["a", "b"], 0).unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);
    }

    #[test]
    fn single_index_must_exist() {
        let err = Question::single("Pick", &["a", "b"], 2).unwrap_err();
        assert_eq!(err, QuestionError::AnswerOutOfRange { index: 2, len: 2 });
    }

    #[test]
    fn sequence_must_be_a_permutation() {
        let err = Question::new(
            "Order",
            options(&["a", "b", "c"]),
            QuestionKind::Sequence {
                correct_sequence: vec![0, 0, 2],
            },
            None,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::InvalidSequence);

        let ok = Question::new(
            "Order",
            options(&["a", "b", "c"]),
            QuestionKind::Sequence {
                correct_sequence: vec![2, 0, 1],
            },
            None,
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn multiple_key_lists_each_option_once() {
        let err = Question::new(
            "Pick",
            options(&["a", "b"]),
            QuestionKind::Multiple {
                correct: vec![0, 0],
            },
            None,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::DuplicateAnswer(0));

        let err = Question::new(
            "Pick",
            options(&["a", "b"]),
            QuestionKind::Multiple {
                correct: vec![1, 2],
            },
            None,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::AnswerOutOfRange { index: 2, len: 2 });
    }

    #[test]
    fn matching_key_must_cover_left_items() {
        let mut correct = BTreeMap::new();
        correct.insert("DNA".to_owned(), "nucleus".to_owned());
        let err = Question::new(
            "Match",
            Vec::new(),
            QuestionKind::Matching {
                left_items: options(&["DNA", "ATP"]),
                right_items: options(&["nucleus", "mitochondria"]),
                correct,
            },
            None,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::MissingLeftItem("ATP".to_owned()));
    }

    #[test]
    fn blank_explanation_is_dropped() {
        let q = Question::single("Pick", &["a"], 0)
            .unwrap()
            .with_explanation("  ");
        assert_eq!(q.explanation(), None);
        assert_eq!(q.question_type(), QuestionType::Single);
    }
}
