use chrono::Duration;
use quiz_core::model::{GameResult, Statistics};
use quiz_core::time::fixed_now;
use storage::repository::{StatisticsRepository, Storage};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_starts_without_statistics() {
    let repo = connect("memdb_empty_stats").await;
    assert!(repo.load_statistics().await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_roundtrip_persists_best_game() {
    let repo = connect("memdb_stats_roundtrip").await;

    let mut stats = Statistics::new();
    stats.record(&GameResult::new(2, 3, fixed_now()).unwrap());
    stats.record(&GameResult::new(1, 3, fixed_now() + Duration::minutes(2)).unwrap());
    repo.save_statistics(&stats).await.unwrap();

    let loaded = repo.load_statistics().await.unwrap().expect("saved");
    assert_eq!(loaded.games_count(), 2);
    assert_eq!(loaded.total_correct_answers(), 3);
    assert_eq!(loaded.total_questions(), 6);
    let best = loaded.best_game().expect("best game");
    assert_eq!(best.correct_answers(), 2);
    assert_eq!(best.date(), fixed_now());
    assert!((loaded.total_accuracy() - 50.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn sqlite_save_overwrites_single_row() {
    let repo = connect("memdb_stats_overwrite").await;

    let mut stats = Statistics::new();
    stats.record(&GameResult::new(4, 10, fixed_now()).unwrap());
    repo.save_statistics(&stats).await.unwrap();

    stats.record(&GameResult::new(9, 10, fixed_now()).unwrap());
    repo.save_statistics(&stats).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM statistics")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);

    let loaded = repo.load_statistics().await.unwrap().expect("saved");
    assert_eq!(loaded, stats);
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = connect("memdb_stats_migrate_twice").await;
    repo.migrate().await.expect("second migrate");

    let versions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(versions, 1);
}

#[tokio::test]
async fn storage_facade_uses_sqlite_backend() {
    let storage = Storage::sqlite("sqlite:file:memdb_stats_facade?mode=memory&cache=shared")
        .await
        .expect("storage");

    let mut stats = Statistics::new();
    stats.record(&GameResult::new(0, 10, fixed_now()).unwrap());
    storage.statistics.save_statistics(&stats).await.unwrap();

    let loaded = storage.statistics.load_statistics().await.unwrap();
    assert_eq!(loaded, Some(stats));
}
