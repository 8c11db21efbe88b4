use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{
    error::AppError,
    models::quiz_result::{QuizResult, ResultSummary},
    store::Repository,
};

/// The user dashboard: account statistics plus every result of the user.
#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    pub username: String,
    pub full_name: String,
    pub last_login: NaiveDateTime,
    pub quizzes_taken: u32,
    pub high_score: u32,
    pub results: Vec<ResultSummary>,
}

/// Results of `username`, oldest first.
pub fn list_results_for_user(repo: &Repository, username: &str) -> Vec<QuizResult> {
    repo.results_for_user(username).cloned().collect()
}

/// Get a user's profile and statistics.
pub fn get_profile(repo: &Repository, username: &str) -> Result<ProfileSummary, AppError> {
    let user = repo
        .find_user(username)
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    let results = repo
        .results_for_user(username)
        .map(|r| ResultSummary {
            quiz_name: repo
                .find_quiz(&r.quiz_code)
                .map(|q| q.name.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            quiz_code: r.quiz_code.clone(),
            score: r.score,
            total_questions: r.total_questions,
            percent: r.percent(),
            timestamp: r.timestamp,
        })
        .collect();

    Ok(ProfileSummary {
        username: user.username.clone(),
        full_name: user.full_name.clone(),
        last_login: user.last_login,
        quizzes_taken: user.quizzes_taken,
        high_score: user.high_score,
        results,
    })
}
