use quiz_core::model::{ALL_TOPICS_KEY, Subject, SubjectSummary, TopicSelector};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectCardVm {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub counts_label: String,
}

#[must_use]
pub fn map_subject_cards(subjects: &[SubjectSummary]) -> Vec<SubjectCardVm> {
    subjects
        .iter()
        .map(|s| SubjectCardVm {
            key: s.key.clone(),
            name: s.name.clone(),
            description: s.description.clone(),
            counts_label: format!(
                "{} {}, {} {}",
                s.topic_count,
                plural(s.topic_count, "topic", "topics"),
                s.question_count,
                plural(s.question_count, "question", "questions"),
            ),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicItemVm {
    /// Key accepted by `TopicSelector::parse`.
    pub key: String,
    pub label: String,
    pub question_count: usize,
    pub selector: TopicSelector,
}

/// Topic list for a subject, followed by the combined "all topics" entry.
#[must_use]
pub fn map_topic_items(subject: &Subject) -> Vec<TopicItemVm> {
    let mut items: Vec<TopicItemVm> = subject
        .topics
        .iter()
        .map(|topic| TopicItemVm {
            key: topic.name.clone(),
            label: topic.name.clone(),
            question_count: topic.questions.len(),
            selector: TopicSelector::Named(topic.name.clone()),
        })
        .collect();

    items.push(TopicItemVm {
        key: ALL_TOPICS_KEY.to_owned(),
        label: "All topics".to_owned(),
        question_count: items.iter().map(|item| item.question_count).sum(),
        selector: TopicSelector::All,
    });
    items
}

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 { one } else { many }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, Topic};

    fn subject() -> Subject {
        let q = |text: &str| Question::single(text, &["a", "b"], 0).unwrap();
        Subject::new(
            "bio",
            "Biology",
            vec![
                Topic::new("Cells", vec![q("Q1"), q("Q2")]),
                Topic::new("Genes", vec![q("Q3")]),
            ],
        )
    }

    #[test]
    fn all_topics_entry_comes_last() {
        let items = map_topic_items(&subject());
        let keys: Vec<_> = items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["Cells", "Genes", "all"]);
        assert_eq!(items[2].question_count, 3);
        assert_eq!(items[2].selector, TopicSelector::All);
        assert_eq!(TopicSelector::parse(&items[0].key), items[0].selector);
    }

    #[test]
    fn subject_card_counts() {
        let cards = map_subject_cards(&[subject().summary()]);
        assert_eq!(cards[0].counts_label, "2 topics, 3 questions");
    }
}
