use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;

use quiz_core::Clock;
use quiz_core::grade;
use quiz_core::model::{Answer, AnsweredRecord, Question, QuizResults, summarize};

use super::progress::{QuestionStatus, SessionProgress};
use super::shuffle::shuffle_with;
use super::view::SessionSnapshot;
use crate::error::SessionError;

/// Number of questions revealed per page.
pub const DEFAULT_PAGE_SIZE: usize = 5;

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Knobs for building a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    page_size: usize,
    shuffle: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            shuffle: true,
        }
    }
}

impl SessionConfig {
    /// Page size is clamped to at least one question.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Disable shuffling to keep catalog order (deterministic runs).
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn shuffle(&self) -> bool {
        self.shuffle
    }
}

//
// ─── TRANSITION RESULTS ────────────────────────────────────────────────────────
//

/// How `restart` treats the question order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartMode {
    /// Keep the current shuffled order and paginate from the start.
    SameOrder,
    /// Draw a fresh order.
    Reshuffle,
}

/// Identifies the session state a deferred action was scheduled against.
///
/// Any navigation invalidates previously issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdvanceToken(u64);

/// Verdict for a submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub question_index: usize,
    pub is_correct: bool,
    /// Explanation to surface; only present for incorrect answers.
    pub explanation: Option<String>,
    /// Token for a deferred `advance_if` (auto-advance on correct answers).
    pub token: AdvanceToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Moved to the next already-visible question.
    Moved,
    /// Revealed the next page and moved onto it.
    PageLoaded,
    /// No questions left; the session is now complete.
    Completed,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory quiz run over a shuffled question set.
///
/// Questions are revealed one page at a time. Every question must be answered
/// before moving past it, answers are final, and navigation back (or to any
/// answered question) is always allowed while the session is active.
pub struct QuizSession {
    config: SessionConfig,
    clock: Clock,
    all_questions: Vec<Question>,
    visible: Vec<Question>,
    current: usize,
    answer_log: Vec<AnsweredRecord>,
    completed: bool,
    cancelled: bool,
    generation: u64,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Shuffle `questions` (unless disabled) and reveal the first page.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no questions are provided.
    pub fn load(
        questions: Vec<Question>,
        config: SessionConfig,
        clock: Clock,
    ) -> Result<Self, SessionError> {
        Self::load_with_rng(questions, config, clock, &mut rand::rng())
    }

    /// Like [`QuizSession::load`] with a caller-supplied RNG.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no questions are provided.
    pub fn load_with_rng<R: Rng>(
        questions: Vec<Question>,
        config: SessionConfig,
        clock: Clock,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        let all_questions = if config.shuffle() {
            shuffle_with(&questions, rng)
        } else {
            questions
        };

        let mut session = Self {
            config,
            clock,
            all_questions,
            visible: Vec::new(),
            current: 0,
            answer_log: Vec::new(),
            completed: false,
            cancelled: false,
            generation: 0,
            started_at: clock.now(),
            completed_at: None,
        };
        session.reset();
        tracing::info!(
            questions = session.all_questions.len(),
            page_size = config.page_size(),
            "quiz session loaded"
        );
        Ok(session)
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn config(&self) -> SessionConfig {
        self.config
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.visible.get(self.current)
    }

    #[must_use]
    pub fn visible_questions(&self) -> &[Question] {
        &self.visible
    }

    /// Size of the whole shuffled set, including pages not yet revealed.
    /// After an early finish only the answered questions count.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        if self.cancelled {
            self.visible.len()
        } else {
            self.all_questions.len()
        }
    }

    #[must_use]
    pub fn answer_log(&self) -> &[AnsweredRecord] {
        &self.answer_log
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// True when the session ended through `cancel_early`.
    #[must_use]
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn answer_for(&self, index: usize) -> Option<&AnsweredRecord> {
        self.answer_log.iter().find(|r| r.question_index == index)
    }

    /// The answer previously submitted at `index`, for read-only redisplay.
    #[must_use]
    pub fn draft_for(&self, index: usize) -> Option<&Answer> {
        self.answer_for(index).map(|r| &r.selected_answer)
    }

    #[must_use]
    pub fn is_current_answered(&self) -> bool {
        self.answer_for(self.current).is_some()
    }

    /// At or before the current position, or already answered.
    #[must_use]
    pub fn visited(&self, index: usize) -> bool {
        index <= self.current || self.answer_for(index).is_some()
    }

    #[must_use]
    pub fn question_status(&self, index: usize) -> QuestionStatus {
        match self.answer_for(index) {
            Some(record) if record.is_correct => QuestionStatus::Correct,
            Some(_) => QuestionStatus::Incorrect,
            None if index == self.current => QuestionStatus::Current,
            None if self.visited(index) => QuestionStatus::Open,
            None => QuestionStatus::Locked,
        }
    }

    /// Token matching the current state; see [`QuizSession::advance_if`].
    #[must_use]
    pub fn advance_token(&self) -> AdvanceToken {
        AdvanceToken(self.generation)
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            visible_questions: &self.visible,
            current_index: self.current,
            answer_log: &self.answer_log,
            completed: self.completed,
            cancelled: self.cancelled,
            total_questions: self.total_questions(),
        }
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.total_questions();
        SessionProgress {
            position: (self.current + 1).min(total),
            total,
            answered: self.answer_log.len(),
            correct: self.answer_log.iter().filter(|r| r.is_correct).count(),
            is_complete: self.completed,
        }
    }

    /// Score and review lines for the answers given so far.
    #[must_use]
    pub fn results(&self) -> QuizResults {
        summarize(&self.answer_log, |index| self.visible.get(index))
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    /// Grade `answer` against the current question and log it.
    ///
    /// Returns `None` without changing anything when the current question was
    /// already answered or the session is complete.
    pub fn submit(&mut self, answer: Answer) -> Option<SubmitOutcome> {
        if self.completed {
            tracing::debug!("submit ignored: session complete");
            return None;
        }
        if self.is_current_answered() {
            tracing::debug!(index = self.current, "submit ignored: already answered");
            return None;
        }

        let question = self.visible.get(self.current)?;
        let is_correct = grade(question, &answer);
        let explanation = if is_correct {
            None
        } else {
            question.explanation().map(str::to_owned)
        };

        self.answer_log
            .push(AnsweredRecord::new(self.current, answer, is_correct));
        tracing::debug!(index = self.current, is_correct, "answer submitted");

        Some(SubmitOutcome {
            question_index: self.current,
            is_correct,
            explanation,
            token: self.advance_token(),
        })
    }

    /// Move to the next question, revealing the next page when needed, or
    /// complete the session after the last question.
    ///
    /// Returns `None` when the current question is unanswered or the session
    /// is already complete.
    pub fn advance(&mut self) -> Option<AdvanceOutcome> {
        if self.completed {
            tracing::debug!("advance ignored: session complete");
            return None;
        }
        if !self.is_current_answered() {
            tracing::debug!(index = self.current, "advance ignored: unanswered");
            return None;
        }

        let outcome = if self.current + 1 < self.visible.len() {
            self.current += 1;
            AdvanceOutcome::Moved
        } else if self.reveal_next_page() {
            self.current += 1;
            AdvanceOutcome::PageLoaded
        } else {
            self.finish();
            AdvanceOutcome::Completed
        };
        self.touch();
        tracing::debug!(index = self.current, ?outcome, "advanced");
        Some(outcome)
    }

    /// Advance only if nothing happened since `token` was issued.
    pub fn advance_if(&mut self, token: AdvanceToken) -> Option<AdvanceOutcome> {
        if token != self.advance_token() {
            tracing::debug!("stale advance dropped");
            return None;
        }
        self.advance()
    }

    /// Step back one question. Answers are kept.
    pub fn retreat(&mut self) -> bool {
        if self.completed || self.current == 0 {
            return false;
        }
        self.current -= 1;
        self.touch();
        tracing::debug!(index = self.current, "retreated");
        true
    }

    /// Jump to a visited question; unvisited positions are refused.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if self.completed || index >= self.visible.len() || !self.visited(index) {
            tracing::debug!(index, current = self.current, "jump refused");
            return false;
        }
        if index != self.current {
            self.current = index;
            self.touch();
        }
        true
    }

    /// End the session now, keeping only the answered questions.
    ///
    /// The visible list shrinks to the answered questions in their original
    /// order and each log entry is re-keyed to its new position.
    pub fn cancel_early(&mut self) {
        if self.completed {
            return;
        }

        let mut positions: Vec<usize> = self.answer_log.iter().map(|r| r.question_index).collect();
        positions.sort_unstable();

        let visible: Vec<Question> = positions
            .iter()
            .filter_map(|&old| self.visible.get(old).cloned())
            .collect();
        let answer_log = self
            .answer_log
            .iter()
            .filter_map(|record| {
                let new_index = positions.binary_search(&record.question_index).ok()?;
                Some(AnsweredRecord::new(
                    new_index,
                    record.selected_answer.clone(),
                    record.is_correct,
                ))
            })
            .collect();

        self.visible = visible;
        self.answer_log = answer_log;
        self.current = 0;
        self.cancelled = true;
        self.finish();
        self.touch();
        tracing::info!(answered = self.answer_log.len(), "quiz cancelled early");
    }

    /// Start over with a fresh log, either in the same order or reshuffled.
    pub fn restart(&mut self, mode: RestartMode) {
        self.restart_with_rng(mode, &mut rand::rng());
    }

    pub fn restart_with_rng<R: Rng>(&mut self, mode: RestartMode, rng: &mut R) {
        if mode == RestartMode::Reshuffle {
            self.all_questions = shuffle_with(&self.all_questions, rng);
        }
        self.reset();
        tracing::info!(?mode, "quiz restarted");
    }

    //
    // ─── INTERNALS ─────────────────────────────────────────────────────────────
    //

    fn reset(&mut self) {
        let first_page = self.config.page_size().min(self.all_questions.len());
        self.visible = self.all_questions[..first_page].to_vec();
        self.current = 0;
        self.answer_log.clear();
        self.completed = false;
        self.cancelled = false;
        self.started_at = self.clock.now();
        self.completed_at = None;
        self.touch();
    }

    fn reveal_next_page(&mut self) -> bool {
        let start = self.visible.len();
        if start >= self.all_questions.len() {
            return false;
        }
        let end = (start + self.config.page_size()).min(self.all_questions.len());
        self.visible
            .extend_from_slice(&self.all_questions[start..end]);
        tracing::debug!(revealed = end - start, "next page revealed");
        true
    }

    fn finish(&mut self) {
        self.completed = true;
        self.completed_at = Some(self.clock.now());
        tracing::info!(
            answered = self.answer_log.len(),
            correct = self.answer_log.iter().filter(|r| r.is_correct).count(),
            "quiz completed"
        );
    }

    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("all_len", &self.all_questions.len())
            .field("visible_len", &self.visible.len())
            .field("current", &self.current)
            .field("answered", &self.answer_log.len())
            .field("completed", &self.completed)
            .field("cancelled", &self.cancelled)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
