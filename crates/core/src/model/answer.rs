use std::collections::BTreeMap;

use crate::model::question::QuestionType;

/// A submitted answer. Each variant mirrors the answer key of one question type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Single(usize),
    Multiple(Vec<usize>),
    FillBlank(String),
    Matching(BTreeMap<String, String>),
    Sequence(Vec<usize>),
}

impl Answer {
    #[must_use]
    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::Single(_) => QuestionType::Single,
            Self::Multiple(_) => QuestionType::Multiple,
            Self::FillBlank(_) => QuestionType::FillBlank,
            Self::Matching(_) => QuestionType::Matching,
            Self::Sequence(_) => QuestionType::Sequence,
        }
    }

    /// True when nothing was actually chosen or typed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(_) => false,
            Self::Multiple(indices) | Self::Sequence(indices) => indices.is_empty(),
            Self::FillBlank(text) => text.trim().is_empty(),
            Self::Matching(pairs) => pairs.is_empty(),
        }
    }
}

/// Log entry written when the question at `question_index` is submitted.
///
/// `question_index` is a position in the session's visible question list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsweredRecord {
    pub question_index: usize,
    pub selected_answer: Answer,
    pub is_correct: bool,
}

impl AnsweredRecord {
    #[must_use]
    pub fn new(question_index: usize, selected_answer: Answer, is_correct: bool) -> Self {
        Self {
            question_index,
            selected_answer,
            is_correct,
        }
    }
}
