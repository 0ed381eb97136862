use quiz_core::model::{GameResult, Question, Statistics};

use super::progress::QuestionPosition;

/// Receives round events. Implementations render; they never mutate the round.
pub trait QuizPresenter: Send + Sync {
    fn on_question_ready(&self, question: &Question, position: QuestionPosition);

    fn on_answer_scored(&self, was_correct: bool);

    fn on_round_completed(&self, result: &GameResult, statistics: &Statistics);

    fn on_load_error(&self, message: &str);
}

/// Presenter that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPresenter;

impl QuizPresenter for NoopPresenter {
    fn on_question_ready(&self, _question: &Question, _position: QuestionPosition) {}

    fn on_answer_scored(&self, _was_correct: bool) {}

    fn on_round_completed(&self, _result: &GameResult, _statistics: &Statistics) {}

    fn on_load_error(&self, _message: &str) {}
}
