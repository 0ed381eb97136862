use async_trait::async_trait;
use chrono::Utc;
use quiz_core::model::{GameResult, Statistics};

use super::SqliteRepository;
use super::mapping::{map_statistics_row, u64_to_i64};
use crate::repository::{StatisticsRepository, StorageError};

#[async_trait]
impl StatisticsRepository for SqliteRepository {
    async fn load_statistics(&self) -> Result<Option<Statistics>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT
                games_count,
                total_correct_answers,
                total_questions,
                best_correct_answers,
                best_total_questions,
                best_date
            FROM statistics
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        map_statistics_row(&row).map(Some)
    }

    async fn save_statistics(&self, statistics: &Statistics) -> Result<(), StorageError> {
        let best = statistics.best_game();

        sqlx::query(
            r"
            INSERT INTO statistics (
                id,
                games_count,
                total_correct_answers,
                total_questions,
                best_correct_answers,
                best_total_questions,
                best_date,
                updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                games_count = excluded.games_count,
                total_correct_answers = excluded.total_correct_answers,
                total_questions = excluded.total_questions,
                best_correct_answers = excluded.best_correct_answers,
                best_total_questions = excluded.best_total_questions,
                best_date = excluded.best_date,
                updated_at = excluded.updated_at
            ",
        )
        .bind(1_i64)
        .bind(i64::from(statistics.games_count()))
        .bind(u64_to_i64(
            "total_correct_answers",
            statistics.total_correct_answers(),
        )?)
        .bind(u64_to_i64("total_questions", statistics.total_questions())?)
        .bind(best.map(|b| i64::from(b.correct_answers())))
        .bind(best.map(|b| i64::from(b.total_questions())))
        .bind(best.map(GameResult::date))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
