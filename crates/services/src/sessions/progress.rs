use std::fmt;

/// 1-based position of a question within the round, e.g. `3/10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionPosition {
    pub number: u32,
    pub total: u32,
}

impl fmt::Display for QuestionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.number, self.total)
    }
}

/// Aggregated view of round progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundProgress {
    pub total: u32,
    pub answered: u32,
    pub correct: u32,
    pub is_complete: bool,
}
