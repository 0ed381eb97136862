mod game_result;
mod question;
mod round;
mod statistics;

pub use game_result::{GameResult, GameResultError};
pub use question::{Question, QuestionImage};
pub use round::{AnswerScore, Round, RoundError, RoundState, DEFAULT_QUESTION_COUNT};
pub use statistics::{Statistics, StatisticsError};
