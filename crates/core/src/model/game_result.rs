use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameResultError {
    #[error("correct answers ({correct}) exceed total questions ({total})")]
    CorrectExceedsTotal { correct: u32, total: u32 },
}

/// Outcome of a single completed round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    correct_answers: u32,
    total_questions: u32,
    date: DateTime<Utc>,
}

impl GameResult {
    /// Build a result for a finished round.
    ///
    /// # Errors
    ///
    /// Returns `GameResultError::CorrectExceedsTotal` if `correct_answers > total_questions`.
    pub fn new(
        correct_answers: u32,
        total_questions: u32,
        date: DateTime<Utc>,
    ) -> Result<Self, GameResultError> {
        if correct_answers > total_questions {
            return Err(GameResultError::CorrectExceedsTotal {
                correct: correct_answers,
                total: total_questions,
            });
        }
        Ok(Self {
            correct_answers,
            total_questions,
            date,
        })
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    /// When the round was completed.
    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Percentage of correct answers in this game, `0.0` for an empty game.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        f64::from(self.correct_answers) / f64::from(self.total_questions) * 100.0
    }

    /// Strictly more correct answers than `other`. Equal scores are not better.
    #[must_use]
    pub fn is_better_than(&self, other: &GameResult) -> bool {
        self.correct_answers > other.correct_answers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn rejects_more_correct_than_asked() {
        let err = GameResult::new(4, 3, fixed_now()).unwrap_err();
        assert_eq!(
            err,
            GameResultError::CorrectExceedsTotal {
                correct: 4,
                total: 3
            }
        );
    }

    #[test]
    fn accuracy_handles_empty_game() {
        let empty = GameResult::new(0, 0, fixed_now()).unwrap();
        assert_eq!(empty.accuracy(), 0.0);

        let half = GameResult::new(5, 10, fixed_now()).unwrap();
        assert!((half.accuracy() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ties_are_not_better() {
        let a = GameResult::new(2, 3, fixed_now()).unwrap();
        let b = GameResult::new(2, 10, fixed_now()).unwrap();
        let c = GameResult::new(3, 10, fixed_now()).unwrap();
        assert!(!b.is_better_than(&a));
        assert!(c.is_better_than(&a));
    }

    #[test]
    fn serializes_with_field_names() {
        let result = GameResult::new(7, 10, fixed_now()).unwrap();
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["correct_answers"], 7);
        assert_eq!(json["total_questions"], 10);
    }
}
