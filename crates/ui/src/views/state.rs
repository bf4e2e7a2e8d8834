use services::SessionError;

/// Failure categories the presentation layer knows how to render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    NotFound,
    EmptySession,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::NotFound => "Subject or topic not found.",
            Self::EmptySession => "No questions found for this selection.",
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl From<&SessionError> for ViewError {
    fn from(err: &SessionError) -> Self {
        match err {
            SessionError::SubjectNotFound(_) | SessionError::TopicNotFound { .. } => {
                Self::NotFound
            }
            SessionError::Empty => Self::EmptySession,
            _ => Self::Unknown,
        }
    }
}

impl From<SessionError> for ViewError {
    fn from(err: SessionError) -> Self {
        Self::from(&err)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

impl<T> ViewState<T> {
    #[must_use]
    pub fn from_result(result: Result<T, ViewError>) -> Self {
        match result {
            Ok(data) => Self::Ready(data),
            Err(err) => Self::Error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::StorageError;

    #[test]
    fn session_errors_map_to_messages() {
        let missing = ViewError::from(SessionError::SubjectNotFound("bio".into()));
        assert_eq!(missing, ViewError::NotFound);
        assert_eq!(
            ViewError::from(SessionError::Empty).message(),
            "No questions found for this selection."
        );
        let storage = SessionError::Storage(StorageError::Connection("down".into()));
        assert_eq!(ViewError::from(storage), ViewError::Unknown);
    }

    #[test]
    fn view_state_from_result() {
        assert_eq!(ViewState::from_result(Ok(3)), ViewState::Ready(3));
        assert_eq!(
            ViewState::<u8>::from_result(Err(ViewError::EmptySession)),
            ViewState::Error(ViewError::EmptySession)
        );
    }
}
