// src/models/user.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{required, semicolon_free};

/// One line of the users store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique, case-sensitive username.
    pub username: String,

    /// Stored and compared as plain text.
    /// Skipped during serialization to prevent leaking it into printed output.
    #[serde(skip)]
    pub password: String,

    pub full_name: String,

    /// Refreshed on every successful login.
    pub last_login: NaiveDateTime,

    pub quizzes_taken: u32,

    /// Best attempt percentage so far (0..=100). Never decreases.
    pub high_score: u32,
}

impl User {
    pub fn new(username: String, password: String, full_name: String, now: NaiveDateTime) -> Self {
        Self {
            username,
            password,
            full_name,
            last_login: now,
            quizzes_taken: 0,
            high_score: 0,
        }
    }

    /// Counts one more completed attempt and keeps the best percentage.
    pub fn record_attempt(&mut self, percent: u32) {
        self.quizzes_taken = self.quizzes_taken.saturating_add(1);
        if percent > self.high_score {
            self.high_score = percent;
        }
    }
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(custom(function = semicolon_free))]
    pub full_name: String,
    #[validate(custom(function = semicolon_free))]
    pub username: String,
    #[validate(custom(function = semicolon_free))]
    pub password: String,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = required))]
    pub username: String,
    #[validate(custom(function = required))]
    pub password: String,
}
