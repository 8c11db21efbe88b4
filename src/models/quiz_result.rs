// src/models/quiz_result.rs

use chrono::NaiveDateTime;
use serde::Serialize;

/// One completed attempt. Rows are only ever appended.
/// Neither `username` nor `quiz_code` is checked against the other stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    pub username: String,
    pub quiz_code: String,
    /// Number of correct answers.
    pub score: u32,
    pub total_questions: u32,
    pub timestamp: NaiveDateTime,
}

impl QuizResult {
    /// Whole-number percentage, rounded down.
    pub fn percent(&self) -> u32 {
        percent(self.score, self.total_questions)
    }
}

/// `floor(correct * 100 / total)`, or 0 for an empty quiz.
pub fn percent(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    // Stored counts can be large enough to overflow `correct * 100` in u32.
    let scaled = u64::from(correct) * 100 / u64::from(total);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Row of the user dashboard: a result joined with the quiz name.
#[derive(Debug, Serialize)]
pub struct ResultSummary {
    /// `"Unknown"` when the quiz has since been deleted.
    pub quiz_name: String,
    pub quiz_code: String,
    pub score: u32,
    pub total_questions: u32,
    pub percent: u32,
    pub timestamp: NaiveDateTime,
}
