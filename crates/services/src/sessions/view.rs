use quiz_core::model::{AnsweredRecord, Question};

/// Read-only state handed to the presentation layer after each transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot<'a> {
    pub visible_questions: &'a [Question],
    pub current_index: usize,
    pub answer_log: &'a [AnsweredRecord],
    pub completed: bool,
    pub cancelled: bool,
    pub total_questions: usize,
}

impl<'a> SessionSnapshot<'a> {
    #[must_use]
    pub fn current_question(&self) -> Option<&'a Question> {
        self.visible_questions.get(self.current_index)
    }

    #[must_use]
    pub fn record_for(&self, index: usize) -> Option<&'a AnsweredRecord> {
        self.answer_log.iter().find(|r| r.question_index == index)
    }
}
