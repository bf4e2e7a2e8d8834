#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;
pub mod theme_service;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::{SessionError, ThemeServiceError};
pub use theme_service::ThemeService;

pub use sessions::{
    AdvanceOutcome, AdvanceToken, QuestionStatus, QuizService, QuizSession, RestartMode,
    SessionConfig, SessionProgress, SessionSnapshot, SubmitOutcome,
};
