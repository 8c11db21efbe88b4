// src/config.rs

use std::{env, path::PathBuf, time::Duration};
use dotenvy::dotenv;

/// File holding one user per line.
pub const USERS_FILE: &str = "quiz_users.txt";
/// File holding one quiz definition per line.
pub const QUIZ_DATA_FILE: &str = "quiz_data.txt";
/// Directory holding one `<code>.txt` question file per quiz.
pub const QUIZ_QUESTIONS_DIR: &str = "quiz_questions";
/// Append-only log of completed attempts.
pub const RESULTS_FILE: &str = "results.txt";

/// Fixed administrator credentials. These never touch the user store.
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Resolution of the attempt countdown.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Timestamp layout shared by the user and result stores.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_dir: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let data_dir = env::var("QUIZ_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let log_dir = env::var("QUIZ_LOG_DIR")
            .unwrap_or_else(|_| "logs".to_string());

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            data_dir,
            log_dir,
            rust_log,
        }
    }
}
