mod auto_advance;
mod draft;
mod quiz_vm;
mod results_vm;
mod time_fmt;
mod topics_vm;

pub use auto_advance::{AutoAdvance, AutoAdvancePolicy, DEFAULT_AUTO_ADVANCE_DELAY};
pub use draft::DraftAnswer;
pub use quiz_vm::{
    MatchRowVm, OptionVm, PendingAction, QuestionBodyVm, QuestionScreenVm, QuizVm, start_quiz,
};
pub use results_vm::{ResultLineVm, ResultsVm, map_results};
pub use time_fmt::{format_datetime, format_elapsed};
pub use topics_vm::{SubjectCardVm, TopicItemVm, map_subject_cards, map_topic_items};
