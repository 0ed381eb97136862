#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod movies;
pub mod question_source;
pub mod sessions;
pub mod statistic_service;

pub use quiz_core::Clock;

pub use app_services::QuizServices;
pub use config::QuizConfig;
pub use error::{QuestionSourceError, QuizError, QuizServicesError};
pub use movies::{MovieQuestionSource, builtin_catalog};
pub use question_source::{QuestionSource, StaticQuestionSource};
pub use statistic_service::StatisticService;

pub use sessions::{
    AnswerOutcome, DeliveryOutcome, NoopPresenter, QuestionDelivery, QuestionPosition,
    QuestionRequest, QuizPresenter, QuizSession, RoundProgress, RoundSummary,
};
