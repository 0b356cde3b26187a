// Tri-state result of a fetch.

use crate::error::FetchError;

/// State of one fetch as seen by its owner.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState<T> {
    #[default]
    Pending,
    Error(FetchError),
    Success(T),
}

impl<T> FetchState<T> {
    pub fn is_error(&self) -> bool {
        matches!(self, FetchState::Error(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchState::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchState::Error(err) => Some(err),
            _ => None,
        }
    }
}
