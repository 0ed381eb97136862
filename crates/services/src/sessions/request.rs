use std::fmt;
use std::sync::Arc;

use quiz_core::model::Question;

use crate::error::QuestionSourceError;
use crate::question_source::QuestionSource;

/// An outstanding request for the next question.
///
/// Resolving it does not touch the session, so the caller may await it while
/// the session stays free to start a new round. The answer is tagged with the
/// round generation it was issued for.
pub struct QuestionRequest {
    generation: u64,
    source: Arc<dyn QuestionSource>,
}

impl QuestionRequest {
    pub(crate) fn new(generation: u64, source: Arc<dyn QuestionSource>) -> Self {
        Self { generation, source }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ask the source for the next question.
    pub async fn resolve(self) -> QuestionDelivery {
        let result = self.source.next_question().await;
        QuestionDelivery {
            generation: self.generation,
            result,
        }
    }
}

impl fmt::Debug for QuestionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestionRequest")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

/// The answer to a `QuestionRequest`, fed back via `QuizSession::deliver`.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDelivery {
    pub generation: u64,
    pub result: Result<Option<Question>, QuestionSourceError>,
}
