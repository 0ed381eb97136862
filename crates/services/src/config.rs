use std::env;

use quiz_core::model::DEFAULT_QUESTION_COUNT;

/// Default rating a movie must exceed for the expected answer to be "yes".
pub const DEFAULT_RATING_THRESHOLD: f32 = 7.0;

/// Tunables for a quiz round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizConfig {
    question_count: u32,
    rating_threshold: f32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_count: DEFAULT_QUESTION_COUNT,
            rating_threshold: DEFAULT_RATING_THRESHOLD,
        }
    }
}

impl QuizConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `QUIZ_QUESTION_COUNT` and `QUIZ_RATING_THRESHOLD`, keeping defaults
    /// for missing or invalid values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(count) = lookup("QUIZ_QUESTION_COUNT")
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|count| *count > 0)
        {
            config.question_count = count;
        }
        if let Some(threshold) = lookup("QUIZ_RATING_THRESHOLD")
            .and_then(|raw| raw.trim().parse::<f32>().ok())
            .filter(|value| value.is_finite())
        {
            config.rating_threshold = threshold;
        }
        config
    }

    /// Zero is ignored; a round always has at least one question.
    #[must_use]
    pub fn with_question_count(mut self, question_count: u32) -> Self {
        if question_count > 0 {
            self.question_count = question_count;
        }
        self
    }

    #[must_use]
    pub fn with_rating_threshold(mut self, rating_threshold: f32) -> Self {
        self.rating_threshold = rating_threshold;
        self
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn rating_threshold(&self) -> f32 {
        self.rating_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_original_round_size() {
        let config = QuizConfig::default();
        assert_eq!(config.question_count(), 10);
        assert!((config.rating_threshold() - 7.0).abs() < f32::EPSILON);
    }

    #[test]
    fn reads_overrides_from_lookup() {
        let config = QuizConfig::from_lookup(lookup_from(&[
            ("QUIZ_QUESTION_COUNT", "5"),
            ("QUIZ_RATING_THRESHOLD", " 8.5 "),
        ]));
        assert_eq!(config.question_count(), 5);
        assert!((config.rating_threshold() - 8.5).abs() < f32::EPSILON);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = QuizConfig::from_lookup(lookup_from(&[
            ("QUIZ_QUESTION_COUNT", "0"),
            ("QUIZ_RATING_THRESHOLD", "NaN"),
        ]));
        assert_eq!(config, QuizConfig::default());
    }

    #[test]
    fn builder_ignores_zero_question_count() {
        let config = QuizConfig::new().with_question_count(0);
        assert_eq!(config.question_count(), DEFAULT_QUESTION_COUNT);
        assert_eq!(QuizConfig::new().with_question_count(3).question_count(), 3);
    }
}
