use serde::{Deserialize, Serialize};

/// Opaque image payload attached to a question.
///
/// The core never decodes images; presenters decide how to render them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionImage {
    /// A URL or bundled asset name.
    Reference(String),
    /// Raw image bytes as delivered by the question source.
    Data(Vec<u8>),
}

impl QuestionImage {
    #[must_use]
    pub fn reference(value: impl Into<String>) -> Self {
        Self::Reference(value.into())
    }

    #[must_use]
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Self::Reference(value) => Some(value),
            Self::Data(_) => None,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Reference(_) => None,
            Self::Data(bytes) => Some(bytes),
        }
    }
}

/// A single yes/no quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    image: QuestionImage,
    text: String,
    correct_answer: bool,
}

impl Question {
    #[must_use]
    pub fn new(image: QuestionImage, text: impl Into<String>, correct_answer: bool) -> Self {
        Self {
            image,
            text: text.into(),
            correct_answer,
        }
    }

    #[must_use]
    pub fn image(&self) -> &QuestionImage {
        &self.image
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn correct_answer(&self) -> bool {
        self.correct_answer
    }

    /// Returns true if `answer` matches the expected answer.
    #[must_use]
    pub fn is_correct(&self, answer: bool) -> bool {
        self.correct_answer == answer
    }
}
