// src/handlers/quiz.rs

use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    attempt::{
        Attempt, AttemptOutcome,
        runner::{self, AttemptEvent, AttemptHandle},
    },
    error::AppError,
    models::{question::Question, quiz::Quiz, user::User},
    store::Repository,
};

/// A running attempt as seen by the caller.
#[derive(Debug)]
pub struct StartedAttempt {
    pub quiz: Quiz,
    /// In the order they will be asked.
    pub questions: Vec<Question>,
    pub handle: AttemptHandle,
    pub events: UnboundedReceiver<AttemptEvent>,
}

pub fn list_quizzes(repo: &Repository) -> &[Quiz] {
    repo.quizzes()
}

pub fn find_quiz<'a>(repo: &'a Repository, code: &str) -> Result<&'a Quiz, AppError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(AppError::BadRequest("Please enter a quiz code".to_string()));
    }
    repo.find_quiz(code)
        .ok_or(AppError::NotFound("Invalid quiz code".to_string()))
}

/// Resolves a quiz code and starts a timed attempt for `user`.
///
/// * Unknown code: `NotFound`.
/// * Quiz without questions: `BadRequest`.
///
/// Must be called inside a tokio runtime.
pub fn start_attempt(repo: &Repository, user: &User, code: &str) -> Result<StartedAttempt, AppError> {
    let quiz = find_quiz(repo, code)?.clone();
    let questions = repo.load_questions(&quiz.code)?;

    let attempt = Attempt::new(&user.username, &quiz.code, questions.clone(), quiz.timer_minutes)?;
    let (handle, events) = runner::spawn(attempt)?;

    tracing::info!(
        "User '{}' started quiz '{}' ({} questions, {} min)",
        user.username,
        quiz.code,
        questions.len(),
        quiz.timer_minutes
    );
    Ok(StartedAttempt {
        quiz,
        questions,
        handle,
        events,
    })
}

/// Persists a finished attempt.
///
/// * Counts the attempt for the user and keeps the best percentage.
/// * Appends the result row.
///
/// A result for a user that no longer exists is still recorded. If the result
/// row cannot be written, the user statistics are put back.
pub fn record_result(repo: &mut Repository, outcome: &AttemptOutcome) -> Result<(), AppError> {
    let username = outcome.result.username.clone();
    let previous = repo.find_user(&username).cloned();

    let updated = repo.update_user(&username, |user| user.record_attempt(outcome.percent))?;
    if updated.is_none() {
        tracing::warn!("Recording result for unknown user '{}'", username);
    }

    if let Err(e) = repo.append_result(outcome.result.clone()) {
        if let Some(previous) = previous {
            let restored = repo.update_user(&username, |user| *user = previous);
            if let Err(restore_err) = restored {
                tracing::error!("Failed to restore statistics of '{}': {}", username, restore_err);
            }
        }
        return Err(e);
    }
    Ok(())
}
