use std::fmt;

use crate::model::question::Question;

/// Topic key that selects the questions of every topic in a subject.
pub const ALL_TOPICS_KEY: &str = "all";

/// Named group of questions inside a subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub name: String,
    pub questions: Vec<Question>,
}

impl Topic {
    #[must_use]
    pub fn new(name: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            name: name.into(),
            questions,
        }
    }
}

/// A subject from the question catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub topics: Vec<Topic>,
}

impl Subject {
    #[must_use]
    pub fn new(key: impl Into<String>, name: impl Into<String>, topics: Vec<Topic>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: None,
            topics,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn topic(&self, name: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.name == name)
    }

    /// Questions selected by `selector`, in catalog order.
    ///
    /// `All` concatenates every topic; `Named` returns `None` when the topic
    /// does not exist.
    #[must_use]
    pub fn resolve_questions(&self, selector: &TopicSelector) -> Option<Vec<Question>> {
        match selector {
            TopicSelector::All => Some(
                self.topics
                    .iter()
                    .flat_map(|t| t.questions.iter().cloned())
                    .collect(),
            ),
            TopicSelector::Named(name) => self.topic(name).map(|t| t.questions.clone()),
        }
    }

    #[must_use]
    pub fn summary(&self) -> SubjectSummary {
        SubjectSummary {
            key: self.key.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            topic_count: self.topics.len(),
            question_count: self.topics.iter().map(|t| t.questions.len()).sum(),
        }
    }
}

/// Listing entry for the subject picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectSummary {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub topic_count: usize,
    pub question_count: usize,
}

/// Which topic(s) of a subject to quiz on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TopicSelector {
    All,
    Named(String),
}

impl TopicSelector {
    /// Parse a topic key; the literal `all` selects every topic.
    #[must_use]
    pub fn parse(key: &str) -> Self {
        if key == ALL_TOPICS_KEY {
            Self::All
        } else {
            Self::Named(key.to_owned())
        }
    }
}

impl fmt::Display for TopicSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicSelector::All => f.write_str(ALL_TOPICS_KEY),
            TopicSelector::Named(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> Subject {
        let q = |text: &str| Question::single(text, &["a", "b"], 0).unwrap();
        Subject::new(
            "biology",
            "Biology",
            vec![
                Topic::new("Cells", vec![q("c1"), q("c2")]),
                Topic::new("Genetics", vec![q("g1")]),
            ],
        )
    }

    #[test]
    fn all_selector_flattens_topics_in_order() {
        let questions = subject().resolve_questions(&TopicSelector::All).unwrap();
        let texts: Vec<_> = questions.iter().map(Question::text).collect();
        assert_eq!(texts, vec!["c1", "c2", "g1"]);
    }

    #[test]
    fn named_selector_finds_topic_or_none() {
        let s = subject();
        let genetics = s.resolve_questions(&TopicSelector::parse("Genetics")).unwrap();
        assert_eq!(genetics.len(), 1);
        assert!(s.resolve_questions(&TopicSelector::parse("Ecology")).is_none());
    }

    #[test]
    fn parse_recognizes_all_key() {
        assert_eq!(TopicSelector::parse("all"), TopicSelector::All);
        assert_eq!(TopicSelector::All.to_string(), "all");
    }

    #[test]
    fn summary_counts_questions() {
        let summary = subject().summary();
        assert_eq!(summary.topic_count, 2);
        assert_eq!(summary.question_count, 3);
    }
}
