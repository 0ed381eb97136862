use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

use crate::model::{GameResult, GameResultError};

/// Number of questions in a round unless configured otherwise.
pub const DEFAULT_QUESTION_COUNT: u32 = 10;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundError {
    #[error("question count must be positive")]
    InvalidQuestionCount,

    #[error("operation not allowed while round is {state}")]
    InvalidState { state: RoundState },

    #[error(transparent)]
    Result(#[from] GameResultError),
}

//
// ─── STATE ────────────────────────────────────────────────────────────────────
//

/// Lifecycle of a round: `NotStarted -> InProgress -> Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundState {
    NotStarted,
    InProgress,
    Completed,
}

impl fmt::Display for RoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RoundState::NotStarted => "not started",
            RoundState::InProgress => "in progress",
            RoundState::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// Outcome of scoring one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerScore {
    pub was_correct: bool,
    /// Present when this answer finished the round.
    pub result: Option<GameResult>,
}

//
// ─── ROUND ────────────────────────────────────────────────────────────────────
//

/// Pure round bookkeeping: index, correct count and timestamps.
///
/// Invariants: `index <= question_count` and `correct_answers <= index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    question_count: u32,
    state: RoundState,
    index: u32,
    correct_answers: u32,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    result: Option<GameResult>,
}

impl Round {
    /// Create a round that has not started yet.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::InvalidQuestionCount` if `question_count` is zero.
    pub fn new(question_count: u32) -> Result<Self, RoundError> {
        if question_count == 0 {
            return Err(RoundError::InvalidQuestionCount);
        }
        Ok(Self {
            question_count,
            state: RoundState::NotStarted,
            index: 0,
            correct_answers: 0,
            started_at: None,
            completed_at: None,
            result: None,
        })
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn state(&self) -> RoundState {
        self.state
    }

    /// Number of answered questions.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// The result of the last completed run, if any.
    #[must_use]
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.state == RoundState::InProgress
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == RoundState::Completed
    }

    /// Begin the round, resetting all counters.
    ///
    /// Starting while already in progress abandons the current run.
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.state = RoundState::InProgress;
        self.index = 0;
        self.correct_answers = 0;
        self.started_at = Some(now);
        self.completed_at = None;
        self.result = None;
    }

    /// Score `answer` against `expected` and advance.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::InvalidState` unless the round is in progress.
    pub fn record_answer(
        &mut self,
        expected: bool,
        answer: bool,
        now: DateTime<Utc>,
    ) -> Result<AnswerScore, RoundError> {
        if self.state != RoundState::InProgress {
            return Err(RoundError::InvalidState { state: self.state });
        }

        let was_correct = expected == answer;
        if was_correct {
            self.correct_answers += 1;
        }
        self.index += 1;

        let result = if self.index == self.question_count {
            Some(self.complete(now)?)
        } else {
            None
        };

        Ok(AnswerScore {
            was_correct,
            result,
        })
    }

    /// Finish the round before all questions were asked (the source ran dry).
    ///
    /// The result counts only the questions actually answered.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::InvalidState` unless the round is in progress.
    pub fn complete_early(&mut self, now: DateTime<Utc>) -> Result<GameResult, RoundError> {
        if self.state != RoundState::InProgress {
            return Err(RoundError::InvalidState { state: self.state });
        }
        self.complete(now)
    }

    fn complete(&mut self, now: DateTime<Utc>) -> Result<GameResult, RoundError> {
        let result = GameResult::new(self.correct_answers, self.index, now)?;
        self.state = RoundState::Completed;
        self.completed_at = Some(now);
        self.result = Some(result);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn zero_questions_is_rejected() {
        assert_eq!(Round::new(0).unwrap_err(), RoundError::InvalidQuestionCount);
    }

    #[test]
    fn answering_before_start_is_invalid() {
        let mut round = Round::new(3).unwrap();
        let err = round.record_answer(true, true, fixed_now()).unwrap_err();
        assert_eq!(
            err,
            RoundError::InvalidState {
                state: RoundState::NotStarted
            }
        );
    }

    #[test]
    fn scores_mixed_answers() {
        let now = fixed_now();
        let mut round = Round::new(3).unwrap();
        round.start(now);

        let expected = [true, false, false];
        let answers = [true, true, false];
        let mut last = None;
        for (e, a) in expected.iter().zip(answers) {
            let score = round.record_answer(*e, a, now + Duration::seconds(5)).unwrap();
            last = score.result;
        }

        let result = last.expect("round completes on last answer");
        assert_eq!(result.correct_answers(), 2);
        assert_eq!(result.total_questions(), 3);
        assert!(round.is_complete());
        assert_eq!(round.completed_at(), Some(now + Duration::seconds(5)));
    }

    #[test]
    fn completed_round_rejects_answers_until_restart() {
        let now = fixed_now();
        let mut round = Round::new(1).unwrap();
        round.start(now);
        round.record_answer(true, true, now).unwrap();

        let err = round.record_answer(true, true, now).unwrap_err();
        assert_eq!(
            err,
            RoundError::InvalidState {
                state: RoundState::Completed
            }
        );

        round.start(now);
        assert!(round.is_in_progress());
        assert_eq!(round.index(), 0);
        assert_eq!(round.correct_answers(), 0);
        assert!(round.result().is_none());
    }

    #[test]
    fn start_while_in_progress_abandons_run() {
        let now = fixed_now();
        let mut round = Round::new(2).unwrap();
        round.start(now);
        round.record_answer(true, true, now).unwrap();

        round.start(now + Duration::minutes(1));
        assert!(round.is_in_progress());
        assert_eq!(round.index(), 0);
        assert_eq!(round.correct_answers(), 0);
        assert_eq!(round.started_at(), Some(now + Duration::minutes(1)));
    }

    #[test]
    fn early_completion_counts_answered_only() {
        let now = fixed_now();
        let mut round = Round::new(10).unwrap();
        round.start(now);
        round.record_answer(true, true, now).unwrap();
        round.record_answer(true, false, now).unwrap();

        let result = round.complete_early(now).unwrap();
        assert_eq!(result.correct_answers(), 1);
        assert_eq!(result.total_questions(), 2);
        assert!(round.is_complete());
    }

    #[test]
    fn early_completion_of_empty_round() {
        let mut round = Round::new(10).unwrap();
        round.start(fixed_now());
        let result = round.complete_early(fixed_now()).unwrap();
        assert_eq!(result.correct_answers(), 0);
        assert_eq!(result.total_questions(), 0);
    }

    #[test]
    fn correct_count_never_exceeds_index() {
        let now = fixed_now();
        let mut round = Round::new(5).unwrap();
        round.start(now);
        for i in 0..5 {
            round.record_answer(i % 2 == 0, true, now).unwrap();
            assert!(round.correct_answers() <= round.index());
            assert!(round.index() <= round.question_count());
        }
    }
}
