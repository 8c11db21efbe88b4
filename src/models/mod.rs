// src/models/mod.rs

pub mod question;
pub mod quiz;
pub mod quiz_result;
pub mod user;

use std::borrow::Cow;

use validator::ValidationError;

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Field must contain something other than whitespace.
pub(crate) fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("required", "All fields are required"));
    }
    Ok(())
}

/// Required field written to a `;`-delimited store.
pub(crate) fn semicolon_free(value: &str) -> Result<(), ValidationError> {
    required(value)?;
    if value.contains([';', '\n', '\r']) {
        return Err(invalid("delimiter", "Field may not contain ';' or line breaks"));
    }
    Ok(())
}

/// Required field written to the `:`-delimited quiz store.
pub(crate) fn colon_free(value: &str) -> Result<(), ValidationError> {
    required(value)?;
    if value.contains([':', '\n', '\r']) {
        return Err(invalid("delimiter", "Field may not contain ':' or line breaks"));
    }
    Ok(())
}
