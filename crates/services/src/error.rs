//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{RoundError, RoundState};
use storage::sqlite::SqliteInitError;

/// Opaque failure reported by a question source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct QuestionSourceError {
    message: String,
}

impl QuestionSourceError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Human-readable description suitable for an error dialog.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors emitted by `QuizSession`.
///
/// `InvalidState` and `NoCurrentQuestion` mean the caller misused the API.
/// `QuestionSource` is recoverable by starting again.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("operation not allowed while round is {state}")]
    InvalidState { state: RoundState },
    #[error("no question is loaded for the current step")]
    NoCurrentQuestion,
    #[error("question source failed: {0}")]
    QuestionSource(#[from] QuestionSourceError),
    #[error(transparent)]
    Round(RoundError),
}

impl From<RoundError> for QuizError {
    fn from(err: RoundError) -> Self {
        match err {
            RoundError::InvalidState { state } => QuizError::InvalidState { state },
            other => QuizError::Round(other),
        }
    }
}

/// Errors emitted while bootstrapping quiz services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
