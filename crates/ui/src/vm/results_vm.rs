use chrono::{DateTime, Utc};
use quiz_core::model::{QuizResults, ResultEntry};

use crate::vm::time_fmt::{format_datetime, format_elapsed};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultLineVm {
    pub number: usize,
    pub question: String,
    pub is_correct: bool,
    pub correct_answer: Option<String>,
    pub submitted_answer: Option<String>,
    pub explanation: Option<String>,
}

impl From<&ResultEntry> for ResultLineVm {
    fn from(entry: &ResultEntry) -> Self {
        Self {
            number: entry.number(),
            question: entry.question_text.clone(),
            is_correct: entry.is_correct,
            correct_answer: entry.correct_answer.clone(),
            submitted_answer: entry.submitted_answer.clone(),
            explanation: entry.explanation.clone(),
        }
    }
}

/// Results screen data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub score_label: String,
    pub percentage_label: String,
    pub cancelled: bool,
    pub completed_at_str: Option<String>,
    pub elapsed_label: Option<String>,
    pub lines: Vec<ResultLineVm>,
}

#[must_use]
pub fn map_results(
    results: &QuizResults,
    cancelled: bool,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
) -> ResultsVm {
    ResultsVm {
        score_label: format!("{} / {}", results.score(), results.total()),
        percentage_label: format!("{}%", results.percentage()),
        cancelled,
        completed_at_str: completed_at.map(format_datetime),
        elapsed_label: completed_at.map(|end| format_elapsed(end - started_at)),
        lines: results.entries().iter().map(ResultLineVm::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use quiz_core::model::{Answer, AnsweredRecord, Question, summarize};
    use quiz_core::time::fixed_now;

    #[test]
    fn maps_scores_and_every_line() {
        let question = Question::single("Powerhouse?", &["Nucleus", "Mitochondria"], 1)
            .unwrap()
            .with_explanation("Mitochondria make ATP.");
        let log = vec![
            AnsweredRecord::new(0, Answer::Single(1), true),
            AnsweredRecord::new(1, Answer::Single(0), false),
        ];
        let results = summarize(&log, |_| Some(&question));
        let started = fixed_now();
        let vm = map_results(&results, false, started, Some(started + TimeDelta::seconds(65)));

        assert_eq!(vm.score_label, "1 / 2");
        assert_eq!(vm.percentage_label, "50%");
        assert_eq!(vm.elapsed_label.as_deref(), Some("1m 05s"));
        assert_eq!(vm.lines.len(), 2);
        assert!(vm.lines[0].is_correct);
        assert_eq!(vm.lines[0].correct_answer, None);
        assert_eq!(
            vm.lines[0].explanation.as_deref(),
            Some("Mitochondria make ATP.")
        );

        let wrong = &vm.lines[1];
        assert!(!wrong.is_correct);
        assert_eq!(wrong.number, 2);
        assert_eq!(wrong.correct_answer.as_deref(), Some("Mitochondria"));
        assert_eq!(wrong.submitted_answer.as_deref(), Some("Nucleus"));
        assert_eq!(
            wrong.explanation.as_deref(),
            Some("Mitochondria make ATP.")
        );
    }
}
