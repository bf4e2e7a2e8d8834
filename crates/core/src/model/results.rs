use std::collections::BTreeMap;

use crate::model::{Answer, AnsweredRecord, Question, QuestionKind};

const NO_ANSWER: &str = "No answer";
const QUESTION_NOT_FOUND: &str = "Question not found";
const LIST_SEPARATOR: &str = ", ";
const SEQUENCE_SEPARATOR: &str = " → ";

/// Review line for one answered question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    /// Position of the question in the session's visible list.
    pub question_index: usize,
    pub question_text: String,
    pub is_correct: bool,
    /// Rendered answer key; only filled for incorrect answers.
    pub correct_answer: Option<String>,
    /// Rendered submission; only filled for incorrect answers.
    pub submitted_answer: Option<String>,
    pub explanation: Option<String>,
}

impl ResultEntry {
    /// One-based number shown to the user.
    #[must_use]
    pub fn number(&self) -> usize {
        self.question_index + 1
    }
}

/// Aggregate score for a finished quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResults {
    score: usize,
    total: usize,
    percentage: u32,
    entries: Vec<ResultEntry>,
}

impl QuizResults {
    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Rounded percentage of correct answers; `0` when nothing was answered.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        self.percentage
    }

    #[must_use]
    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    #[must_use]
    pub fn incorrect(&self) -> impl Iterator<Item = &ResultEntry> {
        self.entries.iter().filter(|e| !e.is_correct)
    }
}

/// Build the results summary from an answer log.
///
/// `lookup` maps a record's `question_index` to its question. Entries follow
/// the log order.
pub fn summarize<'q, F>(answer_log: &[AnsweredRecord], lookup: F) -> QuizResults
where
    F: Fn(usize) -> Option<&'q Question>,
{
    let score = answer_log.iter().filter(|r| r.is_correct).count();
    let total = answer_log.len();

    let entries = answer_log
        .iter()
        .map(|record| {
            let question = lookup(record.question_index);
            let (correct_answer, submitted_answer) = if record.is_correct {
                (None, None)
            } else {
                (
                    Some(question.map_or_else(|| QUESTION_NOT_FOUND.to_owned(), render_correct)),
                    Some(question.map_or_else(
                        || QUESTION_NOT_FOUND.to_owned(),
                        |q| render_answer(q, &record.selected_answer),
                    )),
                )
            };
            ResultEntry {
                question_index: record.question_index,
                question_text: question
                    .map_or_else(|| QUESTION_NOT_FOUND.to_owned(), |q| q.text().to_owned()),
                is_correct: record.is_correct,
                correct_answer,
                submitted_answer,
                explanation: question.and_then(|q| q.explanation().map(str::to_owned)),
            }
        })
        .collect();

    QuizResults {
        score,
        total,
        percentage: percentage(score, total),
        entries,
    }
}

/// `round(100 * score / total)` with halves rounded up, `0` for an empty log.
#[must_use]
pub fn percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rounded = (200 * score + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Human-readable answer key of `question`.
#[must_use]
pub fn render_correct(question: &Question) -> String {
    match question.kind() {
        QuestionKind::Single { correct } => label(question, *correct),
        QuestionKind::Multiple { correct } => join_labels(question, correct, LIST_SEPARATOR),
        QuestionKind::FillBlank { correct } => correct.clone(),
        QuestionKind::Matching { correct, .. } => render_pairs(question, correct),
        QuestionKind::Sequence { correct_sequence } => {
            join_labels(question, correct_sequence, SEQUENCE_SEPARATOR)
        }
    }
}

/// Human-readable rendering of a submission, using the question's labels.
#[must_use]
pub fn render_answer(question: &Question, answer: &Answer) -> String {
    if answer.is_empty() {
        return NO_ANSWER.to_owned();
    }
    match answer {
        Answer::Single(index) => label(question, *index),
        Answer::Multiple(indices) => join_labels(question, indices, LIST_SEPARATOR),
        Answer::FillBlank(text) => text.trim().to_owned(),
        Answer::Matching(pairs) => render_pairs(question, pairs),
        Answer::Sequence(order) => join_labels(question, order, SEQUENCE_SEPARATOR),
    }
}

fn label(question: &Question, index: usize) -> String {
    question
        .answer_label(index)
        .map_or_else(|| format!("#{}", index + 1), str::to_owned)
}

fn join_labels(question: &Question, indices: &[usize], separator: &str) -> String {
    indices
        .iter()
        .map(|i| label(question, *i))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Pairs in the question's left-item order; keys it does not list go last.
fn render_pairs(question: &Question, pairs: &BTreeMap<String, String>) -> String {
    let left_items: &[String] = match question.kind() {
        QuestionKind::Matching { left_items, .. } => left_items,
        _ => &[],
    };
    let listed = left_items
        .iter()
        .filter_map(|left| pairs.get_key_value(left));
    let unlisted = pairs.iter().filter(|(left, _)| !left_items.contains(*left));
    listed
        .chain(unlisted)
        .map(|(left, right)| format!("{left}{SEQUENCE_SEPARATOR}{right}"))
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
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

    #[test]
    fn empty_log_reports_zero_percent() {
        let results = summarize(&[], |_| None);
        assert_eq!(results.total(), 0);
        assert_eq!(results.percentage(), 0);
        assert!(results.entries().is_empty());
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(3, 3), 100);
    }

    #[test]
    fn incorrect_entries_render_both_answers() {
        let question = Question::new(
            "Pick organelles",
            labels(&["Golgi", "Plasmid", "Ribosome"]),
            QuestionKind::Multiple {
                correct: vec![0, 2],
            },
            Some("Plasmids are not organelles.".into()),
        )
        .unwrap();
        let log = vec![AnsweredRecord::new(0, Answer::Multiple(vec![1]), false)];

        let results = summarize(&log, |i| (i == 0).then_some(&question));
        let entry = &results.entries()[0];
        assert_eq!(entry.number(), 1);
        assert_eq!(entry.correct_answer.as_deref(), Some("Golgi, Ribosome"));
        assert_eq!(entry.submitted_answer.as_deref(), Some("Plasmid"));
        assert_eq!(
            entry.explanation.as_deref(),
            Some("Plasmids are not organelles.")
        );
        assert_eq!(results.incorrect().count(), 1);
    }

    #[test]
    fn correct_entries_skip_answer_rendering() {
        let question = Question::single("Pick", &["a", "b"], 1).unwrap();
        let log = vec![AnsweredRecord::new(0, Answer::Single(1), true)];
        let results = summarize(&log, |_| Some(&question));
        assert_eq!(results.score(), 1);
        assert_eq!(results.percentage(), 100);
        assert_eq!(results.entries()[0].correct_answer, None);
    }

    #[test]
    fn renders_sequences_and_pairs() {
        let sequence = Question::new(
            "Order",
            labels(&["G1", "S", "G2"]),
            QuestionKind::Sequence {
                correct_sequence: vec![0, 1, 2],
            },
            None,
        )
        .unwrap();
        assert_eq!(render_correct(&sequence), "G1 → S → G2");
        assert_eq!(
            render_answer(&sequence, &Answer::Sequence(vec![2, 0, 1])),
            "G2 → G1 → S"
        );

        let pairs: BTreeMap<String, String> =
            [("ATP".to_owned(), "energy".to_owned())].into_iter().collect();
        let matching = Question::new(
            "Match",
            Vec::new(),
            QuestionKind::Matching {
                left_items: labels(&["ATP"]),
                right_items: labels(&["energy"]),
                correct: pairs.clone(),
            },
            None,
        )
        .unwrap();
        assert_eq!(render_correct(&matching), "ATP → energy");
        assert_eq!(
            render_answer(&matching, &Answer::Matching(BTreeMap::new())),
            "No answer"
        );
    }

    #[test]
    fn pairs_follow_left_item_order() {
        let correct: BTreeMap<String, String> = [
            ("Ribosome", "protein synthesis"),
            ("Mitochondrion", "ATP production"),
            ("Golgi", "packaging"),
        ]
        .into_iter()
        .map(|(l, r)| (l.to_owned(), r.to_owned()))
        .collect();
        let matching = Question::new(
            "Match",
            Vec::new(),
            QuestionKind::Matching {
                left_items: labels(&["Ribosome", "Mitochondrion", "Golgi"]),
                right_items: labels(&["protein synthesis", "ATP production", "packaging"]),
                correct: correct.clone(),
            },
            None,
        )
        .unwrap();

        assert_eq!(
            render_correct(&matching),
            "Ribosome → protein synthesis, Mitochondrion → ATP production, Golgi → packaging"
        );

        let mut partial = correct;
        partial.remove("Ribosome");
        assert_eq!(
            render_answer(&matching, &Answer::Matching(partial)),
            "Mitochondrion → ATP production, Golgi → packaging"
        );
    }

    #[test]
    fn missing_question_is_reported() {
        let log = vec![AnsweredRecord::new(4, Answer::Single(0), false)];
        let results = summarize(&log, |_| None);
        let entry = &results.entries()[0];
        assert_eq!(entry.question_text, "Question not found");
        assert_eq!(entry.correct_answer.as_deref(), Some("Question not found"));
    }
}
