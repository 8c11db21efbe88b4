// src/handlers/auth.rs

use validator::Validate;

use crate::{
    config::{ADMIN_PASSWORD, ADMIN_USERNAME},
    error::AppError,
    models::user::{CreateUserRequest, LoginRequest, User},
    store::Repository,
    utils::time::now,
};

/// Who is at the keyboard after a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// The fixed administrator account. Not backed by a stored user.
    Admin,
    User(User),
}

/// Registers a new user.
///
/// Returns `Conflict` if the username is taken; the store is left as it was.
pub fn register(repo: &mut Repository, payload: CreateUserRequest) -> Result<User, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user = User::new(
        payload.username.trim().to_string(),
        payload.password.trim().to_string(),
        payload.full_name.trim().to_string(),
        now(),
    );

    repo.insert_user(user.clone()).inspect_err(|e| {
        if matches!(e, AppError::Conflict(_)) {
            tracing::debug!("Registration refused for existing username '{}'", user.username);
        }
    })?;

    tracing::info!("Registered user '{}'", user.username);
    Ok(user)
}

/// Checks a username/password pair against the user store.
///
/// On a match the user's last-login time is refreshed and persisted. A miss is `Ok(None)`.
pub fn authenticate(repo: &mut Repository, username: &str, password: &str) -> Result<Option<User>, AppError> {
    let matches = repo
        .find_user(username)
        .is_some_and(|user| user.password == password);
    if !matches {
        return Ok(None);
    }
    repo.update_user(username, |user| user.last_login = now())
}

/// Logs in either the fixed administrator or a stored user.
pub fn login(repo: &mut Repository, payload: LoginRequest) -> Result<Session, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let username = payload.username.trim();
    let password = payload.password.trim();

    if username == ADMIN_USERNAME && password == ADMIN_PASSWORD {
        tracing::info!("Administrator logged in");
        return Ok(Session::Admin);
    }

    let user = authenticate(repo, username, password)?
        .ok_or(AppError::AuthError("Invalid username or password".to_string()))?;

    tracing::info!("User '{}' logged in", user.username);
    Ok(Session::User(user))
}
