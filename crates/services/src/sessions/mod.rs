mod progress;
mod service;
mod shuffle;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::{QuestionStatus, SessionProgress};
pub use service::{
    AdvanceOutcome, AdvanceToken, DEFAULT_PAGE_SIZE, QuizSession, RestartMode, SessionConfig,
    SubmitOutcome,
};
pub use shuffle::shuffle_with;
pub use view::SessionSnapshot;
pub use workflow::QuizService;
