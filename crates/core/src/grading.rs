//! Answer grading for every question type.

use std::collections::BTreeSet;

use crate::model::{Answer, Question, QuestionKind};

/// Decide whether `submitted` answers `question` correctly.
///
/// Pure and deterministic. An answer whose shape belongs to another question
/// type is never correct.
#[must_use]
pub fn grade(question: &Question, submitted: &Answer) -> bool {
    match (question.kind(), submitted) {
        (QuestionKind::Single { correct }, Answer::Single(chosen)) => chosen == correct,
        (QuestionKind::Multiple { correct }, Answer::Multiple(chosen)) => {
            as_set(chosen) == as_set(correct)
        }
        (QuestionKind::FillBlank { correct }, Answer::FillBlank(typed)) => {
            normalize_blank(typed) == normalize_blank(correct)
        }
        (QuestionKind::Matching { correct, .. }, Answer::Matching(pairs)) => pairs == correct,
        (QuestionKind::Sequence { correct_sequence }, Answer::Sequence(order)) => {
            order == correct_sequence
        }
        _ => false,
    }
}

fn as_set(indices: &[usize]) -> BTreeSet<usize> {
    indices.iter().copied().collect()
}

fn normalize_blank(text: &str) -> String {
    text.trim().to_lowercase()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    fn multiple(correct: Vec<usize>) -> Question {
        Question::new(
            "Which are organelles?",
            labels(&["Golgi", "Plasmid", "Ribosome", "Capsid"]),
            QuestionKind::Multiple { correct },
            None,
        )
        .unwrap()
    }

    fn matching() -> Question {
        let correct: BTreeMap<_, _> = [("DNA", "nucleus"), ("ATP", "mitochondria")]
            .into_iter()
            .map(|(l, r)| (l.to_owned(), r.to_owned()))
            .collect();
        Question::new(
            "Match",
            Vec::new(),
            QuestionKind::Matching {
                left_items: labels(&["DNA", "ATP"]),
                right_items: labels(&["mitochondria", "nucleus"]),
                correct,
            },
            None,
        )
        .unwrap()
    }

    #[test]
    fn single_compares_index() {
        let q = Question::single("Pick", &["a", "b", "c"], 1).unwrap();
        assert!(grade(&q, &Answer::Single(1)));
        assert!(!grade(&q, &Answer::Single(2)));
    }

    #[test]
    fn multiple_ignores_selection_order() {
        let q = multiple(vec![0, 2]);
        assert!(grade(&q, &Answer::Multiple(vec![2, 0])));
        assert!(grade(&q, &Answer::Multiple(vec![0, 2])));
        assert!(!grade(&q, &Answer::Multiple(vec![0])));
        assert!(!grade(&q, &Answer::Multiple(vec![0, 1, 2])));
    }

    #[test]
    fn multiple_is_set_equality() {
        let q = multiple(vec![0, 2]);
        assert!(grade(&q, &Answer::Multiple(vec![0, 0, 2])));
        assert!(grade(&q, &Answer::Multiple(vec![2, 2, 0, 0])));
        assert!(!grade(&q, &Answer::Multiple(vec![0, 0])));
    }

    #[test]
    fn empty_multiple_only_matches_empty_key() {
        assert!(!grade(&multiple(vec![1]), &Answer::Multiple(Vec::new())));
        assert!(grade(&multiple(Vec::new()), &Answer::Multiple(Vec::new())));
    }

    #[test]
    fn fill_blank_trims_and_ignores_case() {
        let q = Question::new(
            "Organelle that packages proteins",
            Vec::new(),
            QuestionKind::FillBlank {
                correct: "Golgi".into(),
            },
            None,
        )
        .unwrap();
        assert!(grade(&q, &Answer::FillBlank("  golgi  ".into())));
        assert!(!grade(&q, &Answer::FillBlank("golgi body".into())));
    }

    #[test]
    fn matching_requires_every_pair() {
        let q = matching();
        let full: BTreeMap<_, _> = [("ATP", "mitochondria"), ("DNA", "nucleus")]
            .into_iter()
            .map(|(l, r)| (l.to_owned(), r.to_owned()))
            .collect();
        assert!(grade(&q, &Answer::Matching(full.clone())));

        let mut partial = full.clone();
        partial.remove("ATP");
        assert!(!grade(&q, &Answer::Matching(partial)));

        let mut swapped = full;
        swapped.insert("DNA".into(), "mitochondria".into());
        assert!(!grade(&q, &Answer::Matching(swapped)));
    }

    #[test]
    fn sequence_is_positional() {
        let q = Question::new(
            "Order mitosis",
            labels(&["Anaphase", "Prophase", "Metaphase"]),
            QuestionKind::Sequence {
                correct_sequence: vec![1, 2, 0],
            },
            None,
        )
        .unwrap();
        assert!(grade(&q, &Answer::Sequence(vec![1, 2, 0])));
        assert!(!grade(&q, &Answer::Sequence(vec![0, 1, 2])));
    }

    #[test]
    fn mismatched_answer_shape_is_incorrect() {
        let q = Question::single("Pick", &["a", "b"], 0).unwrap();
        assert!(!grade(&q, &Answer::Multiple(vec![0])));
        assert!(!grade(&q, &Answer::FillBlank("a".into())));
    }

    #[test]
    fn grading_is_repeatable() {
        let q = multiple(vec![1, 3]);
        let answer = Answer::Multiple(vec![3, 1]);
        let first = grade(&q, &answer);
        for _ in 0..10 {
            assert_eq!(grade(&q, &answer), first);
        }
    }
}
