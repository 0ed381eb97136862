use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::config::QuizConfig;
use crate::error::{QuizError, QuizServicesError};
use crate::movies::{MovieCatalogLoader, MovieQuestionSource};
use crate::question_source::QuestionSource;
use crate::sessions::{QuizPresenter, QuizSession};
use crate::statistic_service::StatisticService;

/// Assembles app-facing quiz services over a storage backend.
#[derive(Clone)]
pub struct QuizServices {
    config: QuizConfig,
    clock: Clock,
    source: Arc<dyn QuestionSource>,
    statistics: Arc<StatisticService>,
}

impl QuizServices {
    /// Build services backed by `SQLite` storage and a movie catalog.
    ///
    /// # Errors
    ///
    /// Returns `QuizServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: QuizConfig,
        catalog: Arc<dyn MovieCatalogLoader>,
    ) -> Result<Self, QuizServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, config, movie_source(catalog, config)))
    }

    /// Build services whose statistics live only for this process.
    #[must_use]
    pub fn in_memory(
        clock: Clock,
        config: QuizConfig,
        catalog: Arc<dyn MovieCatalogLoader>,
    ) -> Self {
        Self::from_storage(
            &Storage::in_memory(),
            clock,
            config,
            movie_source(catalog, config),
        )
    }

    /// Build services over an existing storage and any question source.
    #[must_use]
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        config: QuizConfig,
        source: Arc<dyn QuestionSource>,
    ) -> Self {
        Self {
            config,
            clock,
            source,
            statistics: Arc::new(StatisticService::new(Arc::clone(&storage.statistics))),
        }
    }

    #[must_use]
    pub fn config(&self) -> QuizConfig {
        self.config
    }

    #[must_use]
    pub fn statistics(&self) -> Arc<StatisticService> {
        Arc::clone(&self.statistics)
    }

    /// Create a round driver that reports to `presenter`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the configured round is invalid.
    pub fn session(&self, presenter: Arc<dyn QuizPresenter>) -> Result<QuizSession, QuizError> {
        QuizSession::new(
            self.config,
            self.clock,
            Arc::clone(&self.source),
            Arc::clone(&self.statistics),
            presenter,
        )
    }
}

fn movie_source(
    catalog: Arc<dyn MovieCatalogLoader>,
    config: QuizConfig,
) -> Arc<dyn QuestionSource> {
    Arc::new(MovieQuestionSource::new(catalog).with_threshold(config.rating_threshold()))
}
