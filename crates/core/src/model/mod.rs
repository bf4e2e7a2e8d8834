mod answer;
mod catalog;
mod question;
mod results;
mod theme;

pub use answer::{Answer, AnsweredRecord};
pub use catalog::{ALL_TOPICS_KEY, Subject, SubjectSummary, Topic, TopicSelector};
pub use question::{Question, QuestionError, QuestionKind, QuestionType};
pub use results::{QuizResults, ResultEntry, percentage, render_answer, render_correct, summarize};
pub use theme::{Theme, ThemeParseError, ThemePreference, ThemeSource};
