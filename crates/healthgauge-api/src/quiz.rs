//! Questionnaire scoring.
//!
//! # Design
//! - A submission must answer every question; partial quizzes are rejected.
//! - Answers may be JSON numbers or numeric strings; anything non-finite is invalid.
//! - The raw total is handed to the store, which rounds and clamps it.

use healthgauge_core::api::QUIZ_ANSWER_COUNT;
use serde_json::Value;
use thiserror::Error;

/// Reasons a quiz submission cannot be scored.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    /// Fewer or more answers than questions.
    #[error("Please answer all questions")]
    Incomplete {
        /// Number of answers received.
        answered: usize,
    },
    /// An answer is not a finite number.
    #[error("Invalid answer format")]
    InvalidAnswer {
        /// Zero-based position of the offending answer.
        index: usize,
    },
}

/// Sum the answers of a complete questionnaire.
///
/// # Errors
///
/// Returns [`QuizError::Incomplete`] unless exactly `QUIZ_ANSWER_COUNT`
/// answers are present, and [`QuizError::InvalidAnswer`] for the first answer
/// that is not numeric.
pub fn total_score(answers: &[Value]) -> Result<f64, QuizError> {
    if answers.len() != QUIZ_ANSWER_COUNT {
        return Err(QuizError::Incomplete {
            answered: answers.len(),
        });
    }
    answers
        .iter()
        .enumerate()
        .try_fold(0.0, |total, (index, answer)| {
            answer_value(answer)
                .map(|value| total + value)
                .ok_or(QuizError::InvalidAnswer { index })
        })
}

fn answer_value(answer: &Value) -> Option<f64> {
    let value = match answer {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}
