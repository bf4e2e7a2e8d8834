use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::{
    Answer, Question, QuestionKind, Subject, SubjectSummary, Topic, TopicSelector,
};
use quiz_core::time::fixed_clock;
use services::{AdvanceOutcome, QuizService, RestartMode, SessionConfig, SessionError};
use storage::repository::{InMemoryRepository, QuestionRepository, StorageError};

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

fn mixed_topic() -> Topic {
    let pairs: BTreeMap<String, String> = [("DNA", "nucleus"), ("ATP", "mitochondria")]
        .into_iter()
        .map(|(l, r)| (l.to_owned(), r.to_owned()))
        .collect();
    Topic::new(
        "Cells",
        vec![
            Question::single("Powerhouse?", &["Nucleus", "Mitochondria"], 1).unwrap(),
            Question::new(
                "Organelles?",
                labels(&["Golgi", "Plasmid", "Ribosome"]),
                QuestionKind::Multiple {
                    correct: vec![0, 2],
                },
                None,
            )
            .unwrap(),
            Question::new(
                "Packs proteins",
                Vec::new(),
                QuestionKind::FillBlank {
                    correct: "Golgi".into(),
                },
                Some("The Golgi apparatus packages proteins.".into()),
            )
            .unwrap(),
            Question::new(
                "Match",
                Vec::new(),
                QuestionKind::Matching {
                    left_items: labels(&["DNA", "ATP"]),
                    right_items: labels(&["mitochondria", "nucleus"]),
                    correct: pairs,
                },
                None,
            )
            .unwrap(),
            Question::new(
                "Order",
                labels(&["S", "G1", "G2", "M"]),
                QuestionKind::Sequence {
                    correct_sequence: vec![1, 0, 2, 3],
                },
                None,
            )
            .unwrap(),
            Question::single("Extra", &["a", "b"], 0).unwrap(),
        ],
    )
}

fn service() -> QuizService {
    let repo =
        InMemoryRepository::with_subjects(vec![Subject::new("bio", "Biology", vec![mixed_topic()])]);
    QuizService::new(fixed_clock(), Arc::new(repo))
        .with_config(SessionConfig::default().with_shuffle(false))
}

#[tokio::test]
async fn full_run_across_two_pages() {
    let mut session = service()
        .start_quiz("bio", &TopicSelector::parse("Cells"))
        .await
        .unwrap();
    assert_eq!(session.visible_questions().len(), 5);

    let answers = [
        Answer::Single(1),
        Answer::Multiple(vec![2, 0]),
        Answer::FillBlank("  golgi body ".into()),
        Answer::Matching(
            [("DNA", "nucleus"), ("ATP", "mitochondria")]
                .into_iter()
                .map(|(l, r)| (l.to_owned(), r.to_owned()))
                .collect(),
        ),
        Answer::Sequence(vec![1, 0, 2, 3]),
        Answer::Single(0),
    ];
    let mut outcomes = Vec::new();
    for answer in answers {
        let submitted = session.submit(answer).unwrap();
        if submitted.question_index == 2 {
            assert_eq!(
                submitted.explanation.as_deref(),
                Some("The Golgi apparatus packages proteins.")
            );
        }
        outcomes.push(session.advance().unwrap());
    }

    assert_eq!(outcomes[4], AdvanceOutcome::PageLoaded);
    assert_eq!(outcomes[5], AdvanceOutcome::Completed);
    assert_eq!(session.answer_log().len(), session.visible_questions().len());

    let results = session.results();
    assert_eq!(results.score(), 5);
    assert_eq!(results.total(), 6);
    assert_eq!(results.percentage(), 83);
    let wrong: Vec<_> = results.incorrect().collect();
    assert_eq!(wrong.len(), 1);
    assert_eq!(wrong[0].correct_answer.as_deref(), Some("Golgi"));
    assert_eq!(wrong[0].submitted_answer.as_deref(), Some("golgi body"));
}

#[tokio::test]
async fn restart_after_cancel_starts_clean() {
    let mut session = service()
        .start_quiz("bio", &TopicSelector::All)
        .await
        .unwrap();
    session.submit(Answer::Single(0)).unwrap();
    session.cancel_early();
    assert_eq!(session.results().percentage(), 0);
    assert_eq!(session.visible_questions().len(), 1);

    session.restart(RestartMode::Reshuffle);
    assert!(!session.is_complete());
    assert!(session.answer_log().is_empty());
    assert_eq!(session.total_questions(), 6);
}

struct FailingRepository;

#[async_trait]
impl QuestionRepository for FailingRepository {
    async fn lookup(&self, _subject_key: &str) -> Result<Option<Subject>, StorageError> {
        Err(StorageError::Connection("catalog offline".into()))
    }

    async fn list_subjects(&self) -> Result<Vec<SubjectSummary>, StorageError> {
        Err(StorageError::Connection("catalog offline".into()))
    }
}

#[tokio::test]
async fn storage_failures_are_not_empty_states() {
    let service = QuizService::new(fixed_clock(), Arc::new(FailingRepository));

    let err = service
        .start_quiz("bio", &TopicSelector::All)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Storage(_)));
    assert!(!err.is_empty_state());
    assert!(service.list_subjects().await.is_err());
}
