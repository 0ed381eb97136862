use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use quiz_core::model::Question;

use crate::error::QuestionSourceError;

/// Supplies questions to a round.
///
/// `load_questions` (re)loads the underlying data set and returns it;
/// `next_question` draws the next question or `None` when exhausted.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Load or refresh the data set.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError` if the data set cannot be obtained.
    async fn load_questions(&self) -> Result<Vec<Question>, QuestionSourceError>;

    /// Draw the next question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError` if the question cannot be produced.
    async fn next_question(&self) -> Result<Option<Question>, QuestionSourceError>;
}

#[derive(Debug, Default)]
struct Cursor {
    questions: Vec<Question>,
    next: usize,
}

/// Fixed, ordered list of questions. `load_questions` rewinds to the start.
#[derive(Debug, Clone, Default)]
pub struct StaticQuestionSource {
    cursor: Arc<Mutex<Cursor>>,
}

impl StaticQuestionSource {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            cursor: Arc::new(Mutex::new(Cursor { questions, next: 0 })),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Cursor>, QuestionSourceError> {
        self.cursor
            .lock()
            .map_err(|e| QuestionSourceError::new(e.to_string()))
    }
}

#[async_trait]
impl QuestionSource for StaticQuestionSource {
    async fn load_questions(&self) -> Result<Vec<Question>, QuestionSourceError> {
        let mut cursor = self.lock()?;
        cursor.next = 0;
        Ok(cursor.questions.clone())
    }

    async fn next_question(&self) -> Result<Option<Question>, QuestionSourceError> {
        let mut cursor = self.lock()?;
        let question = cursor.questions.get(cursor.next).cloned();
        if question.is_some() {
            cursor.next += 1;
        }
        Ok(question)
    }
}
