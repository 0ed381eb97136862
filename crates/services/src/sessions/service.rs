use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use quiz_core::model::{GameResult, Question, Round, Statistics};

use super::presenter::QuizPresenter;
use super::progress::{QuestionPosition, RoundProgress};
use super::request::{QuestionDelivery, QuestionRequest};
use crate::Clock;
use crate::config::QuizConfig;
use crate::error::QuizError;
use crate::question_source::QuestionSource;
use crate::statistic_service::StatisticService;

//
// ─── OUTCOMES ─────────────────────────────────────────────────────────────────
//

/// What applying a question delivery did to the round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeliveryOutcome {
    /// A new question is on screen.
    Question(QuestionPosition),
    /// The source ran dry and the round finished early.
    Completed(GameResult),
    /// The delivery belonged to an abandoned round or arrived twice; ignored.
    Stale,
}

/// Result of scoring one answer.
#[derive(Debug)]
pub struct AnswerOutcome {
    pub was_correct: bool,
    /// Request for the next question while the round continues.
    pub next: Option<QuestionRequest>,
    /// Set when this answer completed the round.
    pub result: Option<GameResult>,
}

//
// ─── SESSION ──────────────────────────────────────────────────────────────────
//

/// Drives one `Round` against a question source, the statistics aggregator and
/// a presenter.
///
/// The session is the single owner of round state; every mutation goes through
/// `&mut self`. Wrap it in a mutex if several tasks need to drive it.
pub struct QuizSession {
    clock: Clock,
    round: Round,
    source: Arc<dyn QuestionSource>,
    statistics: Arc<StatisticService>,
    presenter: Arc<dyn QuizPresenter>,
    current: Option<Question>,
    generation: u64,
}

impl QuizSession {
    /// # Errors
    ///
    /// Returns `QuizError::Round` if the configured question count is invalid.
    pub fn new(
        config: QuizConfig,
        clock: Clock,
        source: Arc<dyn QuestionSource>,
        statistics: Arc<StatisticService>,
        presenter: Arc<dyn QuizPresenter>,
    ) -> Result<Self, QuizError> {
        Ok(Self {
            clock,
            round: Round::new(config.question_count())?,
            source,
            statistics,
            presenter,
            current: None,
            generation: 0,
        })
    }

    #[must_use]
    pub fn round(&self) -> &Round {
        &self.round
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    /// Token of the active round; bumps on every start.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.round.is_complete()
    }

    /// True while a question has been requested but not delivered.
    #[must_use]
    pub fn is_awaiting_question(&self) -> bool {
        self.round.is_in_progress() && self.current.is_none()
    }

    #[must_use]
    pub fn progress(&self) -> RoundProgress {
        RoundProgress {
            total: self.round.question_count(),
            answered: self.round.index(),
            correct: self.round.correct_answers(),
            is_complete: self.round.is_complete(),
        }
    }

    #[must_use]
    pub fn statistics(&self) -> Arc<StatisticService> {
        Arc::clone(&self.statistics)
    }

    /// Load the question data set and reset the round.
    ///
    /// Returns the request for the first question. Any request still in flight
    /// from a previous round becomes stale.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::QuestionSource` if loading fails; the round is left
    /// untouched and the presenter is told via `on_load_error`.
    pub async fn start_round(&mut self) -> Result<QuestionRequest, QuizError> {
        match self.source.load_questions().await {
            Ok(questions) => debug!(available = questions.len(), "questions loaded"),
            Err(err) => {
                warn!(error = %err, "question source failed to load");
                self.presenter.on_load_error(err.message());
                return Err(err.into());
            }
        }

        self.generation += 1;
        self.current = None;
        self.round.start(self.clock.now());
        debug!(
            generation = self.generation,
            questions = self.round.question_count(),
            "round started"
        );

        Ok(self.new_request())
    }

    /// Request a question for the active round again, e.g. after a failed fetch.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` unless the round is in progress.
    pub fn request_question(&self) -> Result<QuestionRequest, QuizError> {
        if !self.round.is_in_progress() {
            return Err(QuizError::InvalidState {
                state: self.round.state(),
            });
        }
        Ok(self.new_request())
    }

    /// Apply a resolved question request.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::QuestionSource` if the fetch failed; the round keeps
    /// waiting for a question and the presenter is told via `on_load_error`.
    pub async fn deliver(
        &mut self,
        delivery: QuestionDelivery,
    ) -> Result<DeliveryOutcome, QuizError> {
        if delivery.generation != self.generation
            || !self.round.is_in_progress()
            || self.current.is_some()
        {
            warn!(
                delivered = delivery.generation,
                active = self.generation,
                "discarding stale question delivery"
            );
            return Ok(DeliveryOutcome::Stale);
        }

        match delivery.result {
            Ok(Some(question)) => {
                let position = QuestionPosition {
                    number: self.round.index() + 1,
                    total: self.round.question_count(),
                };
                self.presenter.on_question_ready(&question, position);
                self.current = Some(question);
                Ok(DeliveryOutcome::Question(position))
            }
            Ok(None) => {
                info!(
                    answered = self.round.index(),
                    "question source exhausted, finishing round early"
                );
                let result = self.round.complete_early(self.clock.now())?;
                self.finish(&result).await;
                Ok(DeliveryOutcome::Completed(result))
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch next question");
                self.presenter.on_load_error(err.message());
                Err(err.into())
            }
        }
    }

    /// Score `answer` against the current question and advance.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` unless the round is in progress and
    /// `QuizError::NoCurrentQuestion` while a question is still being fetched.
    pub async fn answer_current(&mut self, answer: bool) -> Result<AnswerOutcome, QuizError> {
        if !self.round.is_in_progress() {
            let state = self.round.state();
            error!(%state, "answer submitted outside of an active round");
            return Err(QuizError::InvalidState { state });
        }
        let Some(question) = self.current.take() else {
            error!("answer submitted before a question was delivered");
            return Err(QuizError::NoCurrentQuestion);
        };

        let score = self
            .round
            .record_answer(question.correct_answer(), answer, self.clock.now())?;
        self.presenter.on_answer_scored(score.was_correct);

        if let Some(result) = score.result {
            self.finish(&result).await;
            return Ok(AnswerOutcome {
                was_correct: score.was_correct,
                next: None,
                result: Some(result),
            });
        }

        Ok(AnswerOutcome {
            was_correct: score.was_correct,
            next: Some(self.new_request()),
            result: None,
        })
    }

    /// Start a round and wait for its first question.
    ///
    /// # Errors
    ///
    /// See `start_round` and `deliver`.
    pub async fn start(&mut self) -> Result<DeliveryOutcome, QuizError> {
        let request = self.start_round().await?;
        let delivery = request.resolve().await;
        self.deliver(delivery).await
    }

    /// Answer the current question and wait for the next one (or the summary).
    ///
    /// Returns whether the answer was correct together with what happened next.
    ///
    /// # Errors
    ///
    /// See `answer_current` and `deliver`. A fetch failure after scoring leaves
    /// the answer counted; retry with `request_question`.
    pub async fn submit_answer(
        &mut self,
        answer: bool,
    ) -> Result<(bool, DeliveryOutcome), QuizError> {
        let outcome = self.answer_current(answer).await?;
        let next = match (outcome.next, outcome.result) {
            (Some(request), _) => {
                let delivery = request.resolve().await;
                self.deliver(delivery).await?
            }
            (None, Some(result)) => DeliveryOutcome::Completed(result),
            (None, None) => DeliveryOutcome::Stale,
        };
        Ok((outcome.was_correct, next))
    }

    fn new_request(&self) -> QuestionRequest {
        QuestionRequest::new(self.generation, Arc::clone(&self.source))
    }

    /// Hand the result to the aggregator and tell the presenter.
    ///
    /// Rounds in which nothing was asked are not recorded as played games.
    async fn finish(&self, result: &GameResult) -> Statistics {
        let statistics = if result.total_questions() == 0 {
            info!("round ended without questions, statistics unchanged");
            self.statistics.snapshot().await
        } else {
            self.statistics.store(result).await
        };

        info!(
            correct = result.correct_answers(),
            total = result.total_questions(),
            games = statistics.games_count(),
            "round completed"
        );
        self.presenter.on_round_completed(result, &statistics);
        statistics
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("round", &self.round)
            .field("current", &self.current)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
