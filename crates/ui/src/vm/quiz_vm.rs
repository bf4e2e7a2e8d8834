use std::sync::{Arc, Mutex, MutexGuard};

use quiz_core::model::{Question, QuestionKind, QuestionType, TopicSelector};
use services::{
    AdvanceOutcome, QuestionStatus, QuizService, QuizSession, RestartMode, SubmitOutcome,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::views::ViewError;
use crate::vm::auto_advance::{AutoAdvance, AutoAdvancePolicy};
use crate::vm::draft::DraftAnswer;
use crate::vm::results_vm::{ResultsVm, map_results};

/// Destructive action waiting for the user to confirm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingAction {
    /// Finish now and score only what was answered.
    CancelEarly,
    /// Leave the quiz without results.
    Quit,
}

impl PendingAction {
    #[must_use]
    pub fn prompt(self) -> &'static str {
        match self {
            Self::CancelEarly => "Finish the quiz early? Only answered questions will be scored.",
            Self::Quit => "Abandon this quiz?",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchRowVm {
    pub left: String,
    pub chosen: Option<String>,
}

/// Per-type body of the question screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuestionBodyVm {
    Choices(Vec<OptionVm>),
    Blank(String),
    Matching {
        rows: Vec<MatchRowVm>,
        right_items: Vec<String>,
    },
    Sequence(Vec<String>),
}

/// Everything needed to draw the question screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionScreenVm {
    pub progress_label: String,
    pub number: usize,
    pub text: String,
    pub question_type: QuestionType,
    pub body: QuestionBodyVm,
    /// `Some(is_correct)` once the question has been answered.
    pub verdict: Option<bool>,
    /// Shown after an incorrect answer.
    pub explanation: Option<String>,
    pub can_submit: bool,
    pub can_go_back: bool,
    pub can_go_next: bool,
    /// "Finish" on the last question of the whole set, "Next" otherwise.
    pub next_label: &'static str,
    pub navigator: Vec<QuestionStatus>,
}

/// Quiz screen state: the running session, the draft for the current
/// question, pending confirmations and the auto-advance timer.
pub struct QuizVm {
    session: Arc<Mutex<QuizSession>>,
    draft: Option<DraftAnswer>,
    draft_index: Option<usize>,
    pending: Option<PendingAction>,
    auto_advance: AutoAdvance,
}

impl QuizVm {
    #[must_use]
    pub fn new(session: QuizSession, policy: AutoAdvancePolicy) -> Self {
        let mut vm = Self {
            session: Arc::new(Mutex::new(session)),
            draft: None,
            draft_index: None,
            pending: None,
            auto_advance: AutoAdvance::new(policy),
        };
        vm.sync_draft();
        vm
    }

    /// Receive an event whenever the timer moves the quiz on.
    #[must_use]
    pub fn with_advance_events(mut self, events: UnboundedSender<AdvanceOutcome>) -> Self {
        let policy = self.auto_advance.policy();
        self.auto_advance = AutoAdvance::new(policy).with_events(events);
        self
    }

    //
    // ─── READ ──────────────────────────────────────────────────────────────────
    //

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the session lock is poisoned.
    pub fn is_complete(&self) -> Result<bool, ViewError> {
        Ok(self.lock()?.is_complete())
    }

    #[must_use]
    pub fn pending(&self) -> Option<PendingAction> {
        self.pending
    }

    #[must_use]
    pub fn draft(&self) -> Option<&DraftAnswer> {
        self.draft.as_ref()
    }

    #[must_use]
    pub fn auto_advance_pending(&self) -> bool {
        self.auto_advance.is_pending()
    }

    /// Current question screen, or `None` once the quiz is complete.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the session lock is poisoned.
    pub fn screen(&mut self) -> Result<Option<QuestionScreenVm>, ViewError> {
        self.sync_draft();
        let session = self.lock()?;
        if session.is_complete() {
            return Ok(None);
        }
        let Some(question) = session.current_question() else {
            return Ok(None);
        };

        let index = session.current_index();
        let record = session.answer_for(index);
        let progress = session.progress();
        let draft = self
            .draft
            .clone()
            .unwrap_or_else(|| DraftAnswer::fresh(question));

        Ok(Some(QuestionScreenVm {
            progress_label: progress.label(),
            number: index + 1,
            text: question.text().to_owned(),
            question_type: question.question_type(),
            body: body_for(question, &draft),
            verdict: record.map(|r| r.is_correct),
            explanation: record
                .filter(|r| !r.is_correct)
                .and_then(|_| question.explanation().map(str::to_owned)),
            can_submit: record.is_none() && draft.is_ready(question),
            can_go_back: index > 0,
            can_go_next: record.is_some(),
            next_label: if progress.is_last() { "Finish" } else { "Next" },
            navigator: (0..session.visible_questions().len())
                .map(|i| session.question_status(i))
                .collect(),
        }))
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the session lock is poisoned.
    pub fn results(&self) -> Result<ResultsVm, ViewError> {
        let session = self.lock()?;
        Ok(map_results(
            &session.results(),
            session.was_cancelled(),
            session.started_at(),
            session.completed_at(),
        ))
    }

    //
    // ─── DRAFT EDITS ───────────────────────────────────────────────────────────
    //
    // Edits are refused once the current question has been answered.

    /// Pick option `index` (zero-based) of a single-choice question.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the session lock is poisoned.
    pub fn select_option(&mut self, index: usize) -> Result<bool, ViewError> {
        self.edit(|question, draft| index < question.answers().len() && draft.select(index))
    }

    /// Flip option `index` of a multiple-choice question.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the session lock is poisoned.
    pub fn toggle_option(&mut self, index: usize) -> Result<bool, ViewError> {
        self.edit(|question, draft| index < question.answers().len() && draft.toggle(index))
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the session lock is poisoned.
    pub fn set_blank(&mut self, text: &str) -> Result<bool, ViewError> {
        self.edit(|_, draft| draft.set_text(text))
    }

    /// Pair a left item with a right item of a matching question.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the session lock is poisoned.
    pub fn set_match(&mut self, left: &str, right: &str) -> Result<bool, ViewError> {
        self.edit(|question, draft| match question.kind() {
            QuestionKind::Matching {
                left_items,
                right_items,
                ..
            } if left_items.iter().any(|l| l == left) && right_items.iter().any(|r| r == right) => {
                draft.set_match(left, right)
            }
            _ => false,
        })
    }

    /// Move the item at `position` one slot earlier in a sequence.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the session lock is poisoned.
    pub fn move_up(&mut self, position: usize) -> Result<bool, ViewError> {
        if position == 0 {
            return Ok(false);
        }
        self.edit(|_, draft| draft.move_item(position, position - 1))
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the session lock is poisoned.
    pub fn move_down(&mut self, position: usize) -> Result<bool, ViewError> {
        self.edit(|_, draft| draft.move_item(position, position + 1))
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    /// Submit the current draft. Correct answers schedule an auto-advance.
    ///
    /// Returns `None` when the draft is incomplete or the question was
    /// already answered.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the session lock is poisoned.
    pub fn submit(&mut self) -> Result<Option<SubmitOutcome>, ViewError> {
        self.sync_draft();
        let outcome = {
            let mut session = self.lock()?;
            let answer = match (session.current_question(), self.draft.as_ref()) {
                (Some(question), Some(draft)) if draft.is_ready(question) => draft.to_answer(),
                _ => None,
            };
            match answer {
                Some(answer) => session.submit(answer),
                None => None,
            }
        };

        if let Some(correct) = outcome.as_ref().filter(|o| o.is_correct) {
            self.auto_advance
                .schedule(Arc::clone(&self.session), correct.token);
        }
        Ok(outcome)
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the session lock is poisoned.
    pub fn next(&mut self) -> Result<Option<AdvanceOutcome>, ViewError> {
        self.auto_advance.cancel();
        let outcome = self.lock()?.advance();
        self.sync_draft();
        Ok(outcome)
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the session lock is poisoned.
    pub fn previous(&mut self) -> Result<bool, ViewError> {
        self.auto_advance.cancel();
        let moved = self.lock()?.retreat();
        self.sync_draft();
        Ok(moved)
    }

    /// Jump to a one-based question number.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the session lock is poisoned.
    pub fn jump_to(&mut self, number: usize) -> Result<bool, ViewError> {
        let Some(index) = number.checked_sub(1) else {
            return Ok(false);
        };
        let moved = self.lock()?.jump_to(index);
        if moved {
            self.auto_advance.cancel();
            self.sync_draft();
        }
        Ok(moved)
    }

    pub fn request(&mut self, action: PendingAction) {
        self.pending = Some(action);
    }

    pub fn dismiss(&mut self) {
        self.pending = None;
    }

    /// Carry out the pending action, if any, and return it.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the session lock is poisoned.
    pub fn confirm(&mut self) -> Result<Option<PendingAction>, ViewError> {
        let Some(action) = self.pending.take() else {
            return Ok(None);
        };
        self.auto_advance.cancel();
        if action == PendingAction::CancelEarly {
            self.lock()?.cancel_early();
            self.sync_draft();
        }
        Ok(Some(action))
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the session lock is poisoned.
    pub fn restart(&mut self, mode: RestartMode) -> Result<(), ViewError> {
        self.auto_advance.cancel();
        self.pending = None;
        self.lock()?.restart(mode);
        self.draft_index = None;
        self.sync_draft();
        Ok(())
    }

    //
    // ─── INTERNALS ─────────────────────────────────────────────────────────────
    //

    fn lock(&self) -> Result<MutexGuard<'_, QuizSession>, ViewError> {
        lock_session(&self.session)
    }

    /// Point the draft at the session's current question: the logged answer
    /// when it was answered, a fresh draft otherwise.
    fn sync_draft(&mut self) {
        let Ok(session) = self.session.lock() else {
            return;
        };
        let index = session.current_index();
        let answered = session.draft_for(index);
        if self.draft_index == Some(index) && answered.is_none() {
            return;
        }

        let draft = match (answered, session.current_question()) {
            (Some(answer), _) => Some(DraftAnswer::restore(answer)),
            (None, Some(question)) => Some(DraftAnswer::fresh(question)),
            (None, None) => None,
        };
        drop(session);
        self.draft = draft;
        self.draft_index = Some(index);
    }

    fn edit<F>(&mut self, apply: F) -> Result<bool, ViewError>
    where
        F: FnOnce(&Question, &mut DraftAnswer) -> bool,
    {
        self.sync_draft();
        let session = lock_session(&self.session)?;
        if session.is_complete() || session.is_current_answered() {
            return Ok(false);
        }
        let (Some(question), Some(draft)) = (session.current_question(), self.draft.as_mut())
        else {
            return Ok(false);
        };
        Ok(apply(question, draft))
    }
}

fn lock_session(session: &Mutex<QuizSession>) -> Result<MutexGuard<'_, QuizSession>, ViewError> {
    session.lock().map_err(|err| {
        tracing::error!(error = %err, "quiz session lock poisoned");
        ViewError::Unknown
    })
}

fn body_for(question: &Question, draft: &DraftAnswer) -> QuestionBodyVm {
    let options = |selected: &dyn Fn(usize) -> bool| -> Vec<OptionVm> {
        question
            .answers()
            .iter()
            .enumerate()
            .map(|(i, label)| OptionVm {
                label: label.clone(),
                selected: selected(i),
            })
            .collect()
    };

    match (question.kind(), draft) {
        (
            QuestionKind::Matching {
                left_items,
                right_items,
                ..
            },
            DraftAnswer::Matching(pairs),
        ) => QuestionBodyVm::Matching {
            rows: left_items
                .iter()
                .map(|left| MatchRowVm {
                    left: left.clone(),
                    chosen: pairs.get(left).cloned(),
                })
                .collect(),
            right_items: right_items.clone(),
        },
        (_, DraftAnswer::FillBlank(text)) => QuestionBodyVm::Blank(text.clone()),
        (_, DraftAnswer::Sequence(order)) => QuestionBodyVm::Sequence(
            order
                .iter()
                .map(|i| {
                    question
                        .answer_label(*i)
                        .map_or_else(|| format!("#{}", i + 1), str::to_owned)
                })
                .collect(),
        ),
        (_, DraftAnswer::Single(choice)) => {
            QuestionBodyVm::Choices(options(&|i| *choice == Some(i)))
        }
        (_, DraftAnswer::Multiple(chosen)) => {
            QuestionBodyVm::Choices(options(&|i| chosen.contains(&i)))
        }
        (_, DraftAnswer::Matching(_)) => QuestionBodyVm::Choices(options(&|_| false)),
    }
}

/// Start a quiz and wrap it for the quiz screen.
///
/// # Errors
///
/// Returns `ViewError::NotFound` for unknown subjects or topics,
/// `ViewError::EmptySession` when the selection has no questions, and
/// `ViewError::Unknown` for other failures.
pub async fn start_quiz(
    service: &QuizService,
    subject_key: &str,
    selector: &TopicSelector,
    policy: AutoAdvancePolicy,
) -> Result<QuizVm, ViewError> {
    let session = service
        .start_quiz(subject_key, selector)
        .await
        .map_err(|err| {
            tracing::warn!(error = %err, subject = subject_key, "quiz could not start");
            ViewError::from(err)
        })?;
    Ok(QuizVm::new(session, policy))
}
