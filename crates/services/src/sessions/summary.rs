use chrono::{DateTime, Utc};

use quiz_core::model::{GameResult, Statistics};

/// End-of-round summary shown to the player.
///
/// Holds raw values; `title` and `message` produce the default English wording.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    pub result: GameResult,
    pub games_count: u32,
    pub best_game: Option<GameResult>,
    pub total_accuracy: f64,
}

impl RoundSummary {
    #[must_use]
    pub fn new(result: GameResult, statistics: &Statistics) -> Self {
        Self {
            result,
            games_count: statistics.games_count(),
            best_game: statistics.best_game().copied(),
            total_accuracy: statistics.total_accuracy(),
        }
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        "This round is over!"
    }

    #[must_use]
    pub fn message(&self) -> String {
        let best = self.best_game.map_or_else(
            || "-".to_string(),
            |best| {
                format!(
                    "{}/{} ({})",
                    best.correct_answers(),
                    best.total_questions(),
                    format_date(best.date())
                )
            },
        );
        format!(
            "Your result: {}/{}\nQuizzes played: {}\nRecord: {}\nAverage accuracy: {:.2}%",
            self.result.correct_answers(),
            self.result.total_questions(),
            self.games_count,
            best,
            self.total_accuracy,
        )
    }
}

fn format_date(at: DateTime<Utc>) -> String {
    at.format("%d.%m.%y %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn message_lists_score_history_and_accuracy() {
        let first = GameResult::new(2, 3, fixed_now()).unwrap();
        let second = GameResult::new(1, 3, fixed_now()).unwrap();
        let mut stats = Statistics::new();
        stats.record(&first);
        stats.record(&second);

        let summary = RoundSummary::new(second, &stats);
        assert_eq!(
            summary.message(),
            "Your result: 1/3\nQuizzes played: 2\nRecord: 2/3 (14.11.23 22:13)\nAverage accuracy: 50.00%"
        );
    }

    #[test]
    fn empty_history_has_placeholder_record() {
        let result = GameResult::new(0, 0, fixed_now()).unwrap();
        let summary = RoundSummary::new(result, &Statistics::new());
        assert!(summary.message().contains("Record: -"));
        assert!(summary.message().ends_with("Average accuracy: 0.00%"));
    }
}
