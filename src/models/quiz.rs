// src/models/quiz.rs

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::colon_free;

/// Quiz codes name files on disk, so only a conservative alphabet is accepted.
static QUIZ_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("quiz code pattern is valid"));

/// One day. Also keeps `timer_minutes * 60` well inside `u32`.
pub const MAX_TIMER_MINUTES: u32 = 1440;

/// Whether `code` may be used as a quiz code, and so as a file name.
pub fn is_valid_code(code: &str) -> bool {
    code.len() <= 64 && QUIZ_CODE.is_match(code)
}

/// One line of the quiz store. Questions live in a separate file named after `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub code: String,
    pub name: String,
    pub subject: String,
    /// Time allowed for one attempt. Always positive.
    pub timer_minutes: u32,
}

/// DTO for creating a new quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(
        length(min = 1, max = 64, message = "Quiz code is required"),
        regex(path = *QUIZ_CODE, message = "Quiz code may only contain letters, digits, '-' and '_'")
    )]
    pub code: String,
    #[validate(custom(function = colon_free))]
    pub name: String,
    #[validate(custom(function = colon_free))]
    pub subject: String,
    #[validate(range(min = 1, max = 1440, message = "Timer must be between 1 and 1440 minutes"))]
    pub timer_minutes: u32,
}

/// DTO for editing a quiz. The code itself cannot be changed.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuizRequest {
    #[validate(custom(function = colon_free))]
    pub name: String,
    #[validate(custom(function = colon_free))]
    pub subject: String,
    #[validate(range(min = 1, max = 1440, message = "Timer must be between 1 and 1440 minutes"))]
    pub timer_minutes: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(code: &str, timer_minutes: u32) -> CreateQuizRequest {
        CreateQuizRequest {
            code: code.to_string(),
            name: "Math".to_string(),
            subject: "Algebra".to_string(),
            timer_minutes,
        }
    }

    #[test]
    fn accepts_plain_codes() {
        assert!(request("Q1", 5).validate().is_ok());
        assert!(request("alg-101_b", 1).validate().is_ok());
    }

    #[test]
    fn rejects_codes_that_escape_the_question_directory() {
        assert!(request("../etc", 5).validate().is_err());
        assert!(request("a/b", 5).validate().is_err());
        assert!(request("", 5).validate().is_err());
    }

    #[test]
    fn rejects_zero_timer() {
        assert!(request("Q1", 0).validate().is_err());
    }

    #[test]
    fn rejects_timer_longer_than_a_day() {
        assert!(request("Q1", MAX_TIMER_MINUTES).validate().is_ok());
        assert!(request("Q1", MAX_TIMER_MINUTES + 1).validate().is_err());
        assert!(request("Q1", 80_000_000).validate().is_err());

        let update = UpdateQuizRequest {
            name: "Math".to_string(),
            subject: "Algebra".to_string(),
            timer_minutes: 80_000_000,
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn code_check_matches_file_name_rules() {
        assert!(is_valid_code("Q1"));
        assert!(!is_valid_code("../quiz_users"));
        assert!(!is_valid_code(""));
    }

    #[test]
    fn rejects_colon_in_name() {
        let mut req = request("Q1", 5);
        req.name = "Math: part 1".to_string();
        assert!(req.validate().is_err());
    }
}
