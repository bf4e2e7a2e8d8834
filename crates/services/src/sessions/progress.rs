/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    /// One-based position of the current question.
    pub position: usize,
    /// Size of the shuffled question set; the answered subset after an early finish.
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// "Question N of M".
    #[must_use]
    pub fn label(&self) -> String {
        format!("Question {} of {}", self.position, self.total)
    }

    /// The current question is the last one of the whole set.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.position == self.total
    }
}

/// Navigation state of one question slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStatus {
    Correct,
    Incorrect,
    Current,
    /// Reachable but not answered yet.
    Open,
    /// Ahead of the current question; jumping there is refused.
    Locked,
}
