use async_trait::async_trait;
use quiz_core::model::Statistics;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for cumulative play statistics.
#[async_trait]
pub trait StatisticsRepository: Send + Sync {
    /// Load persisted statistics, `None` if nothing was ever stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read or the stored
    /// record is inconsistent.
    async fn load_statistics(&self) -> Result<Option<Statistics>, StorageError>;

    /// Replace the persisted statistics. Must be durable when this returns.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the statistics cannot be written.
    async fn save_statistics(&self, statistics: &Statistics) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    statistics: Arc<Mutex<Option<Statistics>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            statistics: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl StatisticsRepository for InMemoryRepository {
    async fn load_statistics(&self) -> Result<Option<Statistics>, StorageError> {
        let guard = self
            .statistics
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(*guard)
    }

    async fn save_statistics(&self, statistics: &Statistics) -> Result<(), StorageError> {
        let mut guard = self
            .statistics
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(*statistics);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub statistics: Arc<dyn StatisticsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let statistics: Arc<dyn StatisticsRepository> = Arc::new(InMemoryRepository::new());
        Self { statistics }
    }
}
