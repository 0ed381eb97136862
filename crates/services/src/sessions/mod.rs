mod presenter;
mod progress;
mod request;
mod service;
mod summary;

// Public API of the round subsystem.
pub use crate::error::QuizError;
pub use presenter::{NoopPresenter, QuizPresenter};
pub use progress::{QuestionPosition, RoundProgress};
pub use request::{QuestionDelivery, QuestionRequest};
pub use service::{AnswerOutcome, DeliveryOutcome, QuizSession};
pub use summary::RoundSummary;
