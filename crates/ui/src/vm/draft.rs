use std::collections::BTreeMap;

use quiz_core::model::{Answer, Question, QuestionKind};

/// In-progress answer for the current question, before it is submitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DraftAnswer {
    Single(Option<usize>),
    /// Selected option indices in the order they were picked.
    Multiple(Vec<usize>),
    FillBlank(String),
    Matching(BTreeMap<String, String>),
    /// Current arrangement of option indices.
    Sequence(Vec<usize>),
}

impl DraftAnswer {
    /// Empty draft for `question`; sequences start in listed order.
    #[must_use]
    pub fn fresh(question: &Question) -> Self {
        match question.kind() {
            QuestionKind::Single { .. } => Self::Single(None),
            QuestionKind::Multiple { .. } => Self::Multiple(Vec::new()),
            QuestionKind::FillBlank { .. } => Self::FillBlank(String::new()),
            QuestionKind::Matching { .. } => Self::Matching(BTreeMap::new()),
            QuestionKind::Sequence { .. } => Self::Sequence((0..question.answers().len()).collect()),
        }
    }

    /// Rebuild the draft from an answer already in the log.
    #[must_use]
    pub fn restore(answer: &Answer) -> Self {
        match answer {
            Answer::Single(index) => Self::Single(Some(*index)),
            Answer::Multiple(indices) => Self::Multiple(indices.clone()),
            Answer::FillBlank(text) => Self::FillBlank(text.clone()),
            Answer::Matching(pairs) => Self::Matching(pairs.clone()),
            Answer::Sequence(order) => Self::Sequence(order.clone()),
        }
    }

    /// Whether the draft is complete enough to submit.
    #[must_use]
    pub fn is_ready(&self, question: &Question) -> bool {
        match (self, question.kind()) {
            (Self::Single(choice), _) => choice.is_some(),
            (Self::Multiple(chosen), _) => !chosen.is_empty(),
            (Self::FillBlank(text), _) => !text.trim().is_empty(),
            (Self::Matching(pairs), QuestionKind::Matching { left_items, .. }) => {
                left_items.iter().all(|left| pairs.contains_key(left))
            }
            (Self::Matching(_), _) => false,
            (Self::Sequence(_), _) => true,
        }
    }

    /// The submittable answer, or `None` while a single choice is unset.
    #[must_use]
    pub fn to_answer(&self) -> Option<Answer> {
        match self {
            Self::Single(choice) => choice.map(Answer::Single),
            Self::Multiple(chosen) => Some(Answer::Multiple(chosen.clone())),
            Self::FillBlank(text) => Some(Answer::FillBlank(text.clone())),
            Self::Matching(pairs) => Some(Answer::Matching(pairs.clone())),
            Self::Sequence(order) => Some(Answer::Sequence(order.clone())),
        }
    }

    pub(crate) fn select(&mut self, index: usize) -> bool {
        match self {
            Self::Single(choice) => {
                *choice = Some(index);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn toggle(&mut self, index: usize) -> bool {
        match self {
            Self::Multiple(chosen) => {
                if let Some(pos) = chosen.iter().position(|i| *i == index) {
                    chosen.remove(pos);
                } else {
                    chosen.push(index);
                }
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_text(&mut self, text: &str) -> bool {
        match self {
            Self::FillBlank(current) => {
                text.clone_into(current);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_match(&mut self, left: &str, right: &str) -> bool {
        match self {
            Self::Matching(pairs) => {
                pairs.insert(left.to_owned(), right.to_owned());
                true
            }
            _ => false,
        }
    }

    pub(crate) fn move_item(&mut self, from: usize, to: usize) -> bool {
        match self {
            Self::Sequence(order) if from < order.len() && to < order.len() => {
                let item = order.remove(from);
                order.insert(to, item);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn multiple_toggle_adds_and_removes() {
        let q = Question::new(
            "Pick",
            labels(&["a", "b", "c"]),
            QuestionKind::Multiple { correct: vec![0] },
            None,
        )
        .unwrap();
        let mut draft = DraftAnswer::fresh(&q);
        assert!(!draft.is_ready(&q));

        draft.toggle(2);
        draft.toggle(0);
        draft.toggle(2);
        assert_eq!(draft, DraftAnswer::Multiple(vec![0]));
        assert!(draft.is_ready(&q));
    }

    #[test]
    fn matching_needs_every_left_item() {
        let q = Question::new(
            "Match",
            Vec::new(),
            QuestionKind::Matching {
                left_items: labels(&["DNA", "ATP"]),
                right_items: labels(&["nucleus", "mitochondria"]),
                correct: [("DNA", "nucleus"), ("ATP", "mitochondria")]
                    .into_iter()
                    .map(|(l, r)| (l.to_owned(), r.to_owned()))
                    .collect(),
            },
            None,
        )
        .unwrap();
        let mut draft = DraftAnswer::fresh(&q);
        draft.set_match("DNA", "nucleus");
        assert!(!draft.is_ready(&q));
        draft.set_match("ATP", "nucleus");
        assert!(draft.is_ready(&q));
    }

    #[test]
    fn sequence_starts_in_listed_order_and_moves() {
        let q = Question::new(
            "Order",
            labels(&["a", "b", "c"]),
            QuestionKind::Sequence {
                correct_sequence: vec![2, 0, 1],
            },
            None,
        )
        .unwrap();
        let mut draft = DraftAnswer::fresh(&q);
        assert_eq!(draft, DraftAnswer::Sequence(vec![0, 1, 2]));
        assert!(draft.move_item(2, 0));
        assert_eq!(draft.to_answer(), Some(Answer::Sequence(vec![2, 0, 1])));
        assert!(!draft.move_item(3, 0));
    }

    #[test]
    fn blank_text_is_not_ready() {
        let q = Question::new(
            "Blank",
            Vec::new(),
            QuestionKind::FillBlank {
                correct: "Golgi".into(),
            },
            None,
        )
        .unwrap();
        let mut draft = DraftAnswer::fresh(&q);
        draft.set_text("   ");
        assert!(!draft.is_ready(&q));
        assert!(!draft.select(0));
    }
}
