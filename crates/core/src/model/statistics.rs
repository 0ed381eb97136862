use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::GameResult;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StatisticsError {
    #[error("cumulative correct answers ({correct}) exceed cumulative questions ({total})")]
    CorrectExceedsTotal { correct: u64, total: u64 },

    #[error("best game must be present exactly when games were played (games: {games_count})")]
    BestGameMismatch { games_count: u32 },
}

/// Cumulative play history across all completed rounds.
///
/// Accuracy is the ratio of all correct answers to all questions asked, never
/// an average of per-game percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    games_count: u32,
    total_correct_answers: u64,
    total_questions: u64,
    best_game: Option<GameResult>,
}

impl Statistics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate statistics from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError::CorrectExceedsTotal` if the cumulative counters are inconsistent,
    /// or `StatisticsError::BestGameMismatch` if a best game is missing for a non-empty history
    /// (or present for an empty one).
    pub fn from_persisted(
        games_count: u32,
        total_correct_answers: u64,
        total_questions: u64,
        best_game: Option<GameResult>,
    ) -> Result<Self, StatisticsError> {
        if total_correct_answers > total_questions {
            return Err(StatisticsError::CorrectExceedsTotal {
                correct: total_correct_answers,
                total: total_questions,
            });
        }
        if (games_count == 0) != best_game.is_none() {
            return Err(StatisticsError::BestGameMismatch { games_count });
        }
        Ok(Self {
            games_count,
            total_correct_answers,
            total_questions,
            best_game,
        })
    }

    #[must_use]
    pub fn games_count(&self) -> u32 {
        self.games_count
    }

    #[must_use]
    pub fn total_correct_answers(&self) -> u64 {
        self.total_correct_answers
    }

    #[must_use]
    pub fn total_questions(&self) -> u64 {
        self.total_questions
    }

    /// Highest-scoring game so far; the earliest one wins ties.
    #[must_use]
    pub fn best_game(&self) -> Option<&GameResult> {
        self.best_game.as_ref()
    }

    /// Overall accuracy in percent. Returns `0.0` when no questions were asked.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn total_accuracy(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.total_correct_answers as f64 / self.total_questions as f64 * 100.0
    }

    /// Fold a completed game into the history.
    pub fn record(&mut self, result: &GameResult) {
        self.games_count = self.games_count.saturating_add(1);
        self.total_correct_answers = self
            .total_correct_answers
            .saturating_add(u64::from(result.correct_answers()));
        self.total_questions = self
            .total_questions
            .saturating_add(u64::from(result.total_questions()));

        let replace = match &self.best_game {
            Some(best) => result.is_better_than(best),
            None => true,
        };
        if replace {
            self.best_game = Some(*result);
        }
    }
}
