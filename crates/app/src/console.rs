use std::io::Write;

use quiz_core::model::{GameResult, Question, QuestionImage, Statistics};
use services::{QuestionPosition, QuizPresenter, RoundSummary};

/// Renders round events as plain text on stdout.
#[derive(Debug, Default)]
pub struct ConsolePresenter;

impl QuizPresenter for ConsolePresenter {
    fn on_question_ready(&self, question: &Question, position: QuestionPosition) {
        println!();
        println!("Question {position}");
        match question.image() {
            QuestionImage::Reference(reference) => println!("  poster: {reference}"),
            QuestionImage::Data(bytes) => println!("  poster: <{} bytes>", bytes.len()),
        }
        println!("  {}", question.text());
    }

    fn on_answer_scored(&self, was_correct: bool) {
        if was_correct {
            println!("Correct!");
        } else {
            println!("Wrong.");
        }
    }

    fn on_round_completed(&self, result: &GameResult, statistics: &Statistics) {
        let summary = RoundSummary::new(*result, statistics);
        println!();
        println!("{}", summary.title());
        println!("{}", summary.message());
    }

    fn on_load_error(&self, message: &str) {
        eprintln!("Error: {message}");
    }
}

/// What the player typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Yes,
    No,
    Quit,
}

pub fn parse_reply(line: &str) -> Option<Reply> {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(Reply::Yes),
        "n" | "no" => Some(Reply::No),
        "q" | "quit" | "exit" => Some(Reply::Quit),
        _ => None,
    }
}

pub fn prompt(text: &str) {
    print!("{text} ");
    // A failed flush only delays the prompt.
    let _ = std::io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_replies_case_insensitively() {
        assert_eq!(parse_reply("Y"), Some(Reply::Yes));
        assert_eq!(parse_reply(" no \n"), Some(Reply::No));
        assert_eq!(parse_reply("QUIT"), Some(Reply::Quit));
        assert_eq!(parse_reply("maybe"), None);
        assert_eq!(parse_reply(""), None);
    }
}
