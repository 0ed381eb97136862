use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use quiz_core::model::{GameResult, Statistics};
use storage::repository::StatisticsRepository;

/// Cumulative statistics backed by a repository.
///
/// The persisted record is read once; from then on the in-memory copy is
/// authoritative and every `store` writes it through. Persistence is
/// best-effort: a failed save is logged and retried with the next `store`.
/// Games stored before the persisted record could be read are folded into it
/// once the repository answers. Stores are serialized so concurrent callers
/// never lose an update.
pub struct StatisticService {
    repo: Arc<dyn StatisticsRepository>,
    state: Mutex<CacheState>,
}

#[derive(Debug, Default)]
struct CacheState {
    stats: Statistics,
    /// The persisted record has been merged into `stats`.
    loaded: bool,
    /// Games recorded while the persisted record was unreadable.
    pending: Vec<GameResult>,
    /// The last save failed; `stats` is ahead of the repository.
    dirty: bool,
}

impl StatisticService {
    #[must_use]
    pub fn new(repo: Arc<dyn StatisticsRepository>) -> Self {
        Self {
            repo,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Fold a completed game into the statistics and write it through.
    pub async fn store(&self, result: &GameResult) -> Statistics {
        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await;

        state.stats.record(result);
        if state.loaded {
            self.persist(&mut state).await;
        } else {
            state.pending.push(*result);
            warn!(
                pending = state.pending.len(),
                "statistics not persisted, keeping in memory"
            );
        }

        debug!(
            games = state.stats.games_count(),
            correct = result.correct_answers(),
            total = result.total_questions(),
            "statistics stored"
        );
        state.stats
    }

    /// Current statistics.
    pub async fn snapshot(&self) -> Statistics {
        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await;
        state.stats
    }

    pub async fn games_count(&self) -> u32 {
        self.snapshot().await.games_count()
    }

    pub async fn best_game(&self) -> Option<GameResult> {
        self.snapshot().await.best_game().copied()
    }

    /// Overall accuracy in percent, `0.0` before any game.
    pub async fn total_accuracy(&self) -> f64 {
        self.snapshot().await.total_accuracy()
    }

    async fn ensure_loaded(&self, state: &mut CacheState) {
        if state.loaded {
            return;
        }

        match self.repo.load_statistics().await {
            Ok(persisted) => {
                let mut stats = persisted.unwrap_or_default();
                for result in &state.pending {
                    stats.record(result);
                }
                state.stats = stats;
                state.loaded = true;

                if !state.pending.is_empty() {
                    debug!(
                        pending = state.pending.len(),
                        "merging games recorded while storage was unavailable"
                    );
                    state.pending.clear();
                    self.persist(state).await;
                }
            }
            Err(err) => {
                warn!(error = %err, "statistics unavailable, using in-memory copy");
            }
        }
    }

    async fn persist(&self, state: &mut CacheState) {
        match self.repo.save_statistics(&state.stats).await {
            Ok(()) => {
                if state.dirty {
                    debug!(games = state.stats.games_count(), "statistics persisted again");
                }
                state.dirty = false;
            }
            Err(err) => {
                warn!(error = %err, "statistics not persisted, keeping in memory");
                state.dirty = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quiz_core::time::fixed_now;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use storage::repository::{InMemoryRepository, StorageError};

    fn result(correct: u32, total: u32) -> GameResult {
        GameResult::new(correct, total, fixed_now()).unwrap()
    }

    /// Repository that can be switched off to simulate an unavailable backend.
    #[derive(Default)]
    struct FlakyRepo {
        inner: InMemoryRepository,
        down: AtomicBool,
        read_only: AtomicBool,
        saves: AtomicUsize,
    }

    #[async_trait]
    impl StatisticsRepository for FlakyRepo {
        async fn load_statistics(&self) -> Result<Option<Statistics>, StorageError> {
            if self.down.load(Ordering::SeqCst) {
                return Err(StorageError::Connection("offline".into()));
            }
            self.inner.load_statistics().await
        }

        async fn save_statistics(&self, statistics: &Statistics) -> Result<(), StorageError> {
            if self.down.load(Ordering::SeqCst) {
                return Err(StorageError::Connection("offline".into()));
            }
            if self.read_only.load(Ordering::SeqCst) {
                return Err(StorageError::Connection("read-only".into()));
            }
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save_statistics(statistics).await
        }
    }

    #[tokio::test]
    async fn fresh_service_reports_zeroes() {
        let service = StatisticService::new(Arc::new(InMemoryRepository::new()));
        assert_eq!(service.games_count().await, 0);
        assert!(service.best_game().await.is_none());
        assert_eq!(service.total_accuracy().await, 0.0);
    }

    #[tokio::test]
    async fn two_rounds_keep_first_best_and_cumulative_accuracy() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = StatisticService::new(repo.clone());

        service.store(&result(2, 3)).await;
        service.store(&result(1, 3)).await;

        assert_eq!(service.games_count().await, 2);
        assert_eq!(service.best_game().await, Some(result(2, 3)));
        assert!((service.total_accuracy().await - 50.0).abs() < f64::EPSILON);

        let persisted = repo.load_statistics().await.unwrap().unwrap();
        assert_eq!(persisted.games_count(), 2);
    }

    #[tokio::test]
    async fn reads_are_idempotent() {
        let service = StatisticService::new(Arc::new(InMemoryRepository::new()));
        service.store(&result(3, 4)).await;

        let first = (
            service.games_count().await,
            service.best_game().await,
            service.total_accuracy().await,
        );
        let second = (
            service.games_count().await,
            service.best_game().await,
            service.total_accuracy().await,
        );
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn writes_through_on_every_store() {
        let repo = Arc::new(FlakyRepo::default());
        let service = StatisticService::new(repo.clone());

        service.store(&result(1, 1)).await;
        service.store(&result(1, 1)).await;

        assert_eq!(repo.saves.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unavailable_repository_degrades_to_memory() {
        let repo = Arc::new(FlakyRepo::default());
        repo.down.store(true, Ordering::SeqCst);
        let service = StatisticService::new(repo.clone());

        let after_first = service.store(&result(2, 3)).await;
        assert_eq!(after_first.games_count(), 1);

        service.store(&result(3, 3)).await;
        assert_eq!(service.games_count().await, 2);
        assert_eq!(service.best_game().await.map(|b| b.correct_answers()), Some(3));
        assert_eq!(repo.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_save_keeps_game_visible_and_retries() {
        let repo = Arc::new(FlakyRepo::default());
        repo.read_only.store(true, Ordering::SeqCst);
        let service = StatisticService::new(repo.clone());

        let stored = service.store(&result(2, 3)).await;
        assert_eq!(stored.games_count(), 1);
        assert_eq!(service.games_count().await, 1);
        assert_eq!(service.best_game().await, Some(result(2, 3)));
        assert!(repo.inner.load_statistics().await.unwrap().is_none());

        repo.read_only.store(false, Ordering::SeqCst);
        service.store(&result(1, 3)).await;

        let persisted = repo.inner.load_statistics().await.unwrap().unwrap();
        assert_eq!(persisted.games_count(), 2);
        assert_eq!(persisted.best_game(), Some(&result(2, 3)));
        assert_eq!(service.games_count().await, 2);
    }

    #[tokio::test]
    async fn games_stored_while_down_survive_recovery() {
        let repo = Arc::new(FlakyRepo::default());
        repo.down.store(true, Ordering::SeqCst);
        let service = StatisticService::new(repo.clone());

        service.store(&result(3, 3)).await;
        repo.down.store(false, Ordering::SeqCst);

        assert_eq!(service.games_count().await, 1);
        assert_eq!(service.best_game().await, Some(result(3, 3)));
        let persisted = repo.inner.load_statistics().await.unwrap().unwrap();
        assert_eq!(persisted.games_count(), 1);
    }

    #[tokio::test]
    async fn recovery_merges_with_previously_persisted_games() {
        let repo = Arc::new(FlakyRepo::default());
        let mut earlier = Statistics::default();
        earlier.record(&result(2, 4));
        repo.inner.save_statistics(&earlier).await.unwrap();
        repo.down.store(true, Ordering::SeqCst);
        let service = StatisticService::new(repo.clone());

        service.store(&result(1, 4)).await;
        repo.down.store(false, Ordering::SeqCst);

        let stats = service.snapshot().await;
        assert_eq!(stats.games_count(), 2);
        assert_eq!(stats.total_correct_answers(), 3);
        assert_eq!(stats.best_game(), Some(&result(2, 4)));
        assert_eq!(
            repo.inner.load_statistics().await.unwrap().unwrap().games_count(),
            2
        );
    }

    #[tokio::test]
    async fn concurrent_stores_are_serialized() {
        let service = Arc::new(StatisticService::new(Arc::new(InMemoryRepository::new())));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.store(&result(1, 2)).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stats = service.snapshot().await;
        assert_eq!(stats.games_count(), 8);
        assert_eq!(stats.total_questions(), 16);
    }
}
