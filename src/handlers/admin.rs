// src/handlers/admin.rs

use validator::Validate;

use crate::{
    error::AppError,
    models::{
        question::{CreateQuestionRequest, Question},
        quiz::{CreateQuizRequest, Quiz, UpdateQuizRequest},
        user::User,
    },
    store::Repository,
};

/// Lists all registered users, in registration order.
/// Admin only.
pub fn list_users(repo: &Repository) -> &[User] {
    repo.users()
}

/// Creates a new quiz.
/// Admin only. A duplicate code is a `Conflict` and leaves the quiz list unchanged.
pub fn create_quiz(repo: &mut Repository, payload: CreateQuizRequest) -> Result<Quiz, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let quiz = Quiz {
        code: payload.code.trim().to_string(),
        name: payload.name.trim().to_string(),
        subject: payload.subject.trim().to_string(),
        timer_minutes: payload.timer_minutes,
    };
    repo.insert_quiz(quiz.clone())?;

    tracing::info!("Quiz '{}' created", quiz.code);
    Ok(quiz)
}

/// Updates name, subject and timer of an existing quiz.
/// Admin only.
pub fn update_quiz(repo: &mut Repository, code: &str, payload: UpdateQuizRequest) -> Result<Quiz, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let quiz = Quiz {
        code: code.to_string(),
        name: payload.name.trim().to_string(),
        subject: payload.subject.trim().to_string(),
        timer_minutes: payload.timer_minutes,
    };
    if !repo.replace_quiz(quiz.clone())? {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    tracing::info!("Quiz '{}' updated", code);
    Ok(quiz)
}

/// Deletes a quiz together with its questions.
/// Admin only.
pub fn delete_quiz(repo: &mut Repository, code: &str) -> Result<Quiz, AppError> {
    let removed = repo
        .remove_quiz(code)?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    tracing::info!("Quiz '{}' removed with its questions", code);
    Ok(removed)
}

/// Lists the questions of a quiz. A deleted quiz has none; a code that is not a
/// valid file name is a `BadRequest`.
pub fn list_questions(repo: &Repository, code: &str) -> Result<Vec<Question>, AppError> {
    repo.load_questions(code)
}

/// Appends a question to an existing quiz.
/// Admin only.
pub fn add_question(repo: &mut Repository, code: &str, payload: CreateQuestionRequest) -> Result<Question, AppError> {
    if repo.find_quiz(code).is_none() {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let question = payload.into_question();
    let mut questions = repo.load_questions(code)?;
    questions.push(question.clone());
    repo.save_questions(code, &questions)?;

    tracing::info!("Question added to quiz '{}' ({} total)", code, questions.len());
    Ok(question)
}

/// Removes the first question whose text matches exactly.
/// Admin only. With duplicate texts only the earliest one goes.
pub fn delete_question(repo: &mut Repository, code: &str, text: &str) -> Result<Question, AppError> {
    if repo.find_quiz(code).is_none() {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }
    let mut questions = repo.load_questions(code)?;
    let index = questions
        .iter()
        .position(|q| q.text == text)
        .ok_or(AppError::NotFound("Question not found".to_string()))?;
    let removed = questions.remove(index);
    repo.save_questions(code, &questions)?;

    tracing::info!("Question removed from quiz '{}'", code);
    Ok(removed)
}
