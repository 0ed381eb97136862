use chrono::{DateTime, Utc};
use quiz_core::model::{GameResult, Statistics};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn u64_from_i64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn u64_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

/// Best-game columns are either all set or all NULL.
fn map_best_game(
    correct: Option<i64>,
    total: Option<i64>,
    date: Option<DateTime<Utc>>,
) -> Result<Option<GameResult>, StorageError> {
    match (correct, total, date) {
        (None, None, None) => Ok(None),
        (Some(correct), Some(total), Some(date)) => GameResult::new(
            u32_from_i64("best_correct_answers", correct)?,
            u32_from_i64("best_total_questions", total)?,
            date,
        )
        .map(Some)
        .map_err(ser),
        _ => Err(StorageError::Serialization(
            "best game columns partially set".into(),
        )),
    }
}

pub(crate) fn map_statistics_row(row: &sqlx::sqlite::SqliteRow) -> Result<Statistics, StorageError> {
    let games_count = u32_from_i64(
        "games_count",
        row.try_get::<i64, _>("games_count").map_err(ser)?,
    )?;
    let total_correct_answers = u64_from_i64(
        "total_correct_answers",
        row.try_get::<i64, _>("total_correct_answers").map_err(ser)?,
    )?;
    let total_questions = u64_from_i64(
        "total_questions",
        row.try_get::<i64, _>("total_questions").map_err(ser)?,
    )?;
    let best_game = map_best_game(
        row.try_get("best_correct_answers").map_err(ser)?,
        row.try_get("best_total_questions").map_err(ser)?,
        row.try_get("best_date").map_err(ser)?,
    )?;

    Statistics::from_persisted(games_count, total_correct_answers, total_questions, best_game)
        .map_err(ser)
}
