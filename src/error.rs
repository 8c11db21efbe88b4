// src/error.rs

use std::fmt;

/// Global Application Error Enum.
/// Every operation reports its failure through one of these; none is fatal.
#[derive(Debug)]
pub enum AppError {
    // Input failed validation (empty field, bad timer, no option selected)
    BadRequest(String),

    // Unknown username/password pair
    AuthError(String),

    // Lookup miss (e.g., unknown quiz code)
    NotFound(String),

    // Duplicate unique key (username, quiz code)
    Conflict(String),

    // The attempt already reached a terminal state
    AttemptClosed,

    // Backing store unreadable or unwritable
    Io(std::io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg)
            | AppError::AuthError(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => f.write_str(msg),
            AppError::AttemptClosed => f.write_str("The quiz attempt has already ended"),
            AppError::Io(err) => write!(f, "Storage error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            _ => None,
        }
    }
}

/// Converts `std::io::Error` into `AppError::Io`.
/// Allows using `?` operator on file operations.
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err)
    }
}
