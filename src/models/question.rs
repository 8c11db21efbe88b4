// src/models/question.rs

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::semicolon_free;

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 4;

/// A multiple-choice question. Belongs to the quiz whose file it is stored in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Also serves as the identity used for deletion (first match wins).
    pub text: String,

    /// Between two and four choices, displayed in order.
    pub options: Vec<String>,

    /// 1-based index into `options`.
    pub correct_option: usize,
}

impl Question {
    /// True when the option count and the correct index respect the record invariants.
    pub fn is_well_formed(&self) -> bool {
        (MIN_OPTIONS..=MAX_OPTIONS).contains(&self.options.len())
            && (1..=self.options.len()).contains(&self.correct_option)
    }

    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_option
    }
}

/// DTO for adding a question to a quiz.
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = validate_correct_option))]
pub struct CreateQuestionRequest {
    #[validate(custom(function = semicolon_free))]
    pub text: String,
    /// Blank entries are dropped before validation, the way the entry form treats empty option fields.
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,
    pub correct_option: usize,
}

impl CreateQuestionRequest {
    pub fn new(text: &str, options: &[&str], correct_option: usize) -> Self {
        Self {
            text: text.trim().to_string(),
            options: options
                .iter()
                .map(|opt| opt.trim())
                .filter(|opt| !opt.is_empty())
                .map(str::to_string)
                .collect(),
            correct_option,
        }
    }

    pub fn into_question(self) -> Question {
        Question {
            text: self.text,
            options: self.options,
            correct_option: self.correct_option,
        }
    }
}

fn validate_options(options: &[String]) -> Result<(), ValidationError> {
    if options.len() < MIN_OPTIONS {
        return Err(ValidationError::new("too_few_options")
            .with_message("Question, Option 1, and Option 2 are required".into()));
    }
    if options.len() > MAX_OPTIONS {
        return Err(ValidationError::new("too_many_options")
            .with_message("At most four options are allowed".into()));
    }
    for opt in options {
        if opt.trim().is_empty() {
            return Err(ValidationError::new("option_cannot_be_empty"));
        }
        if opt.contains([';', ',', '\n', '\r']) {
            return Err(ValidationError::new("option_contains_delimiter")
                .with_message("Options may not contain ';' or ','".into()));
        }
    }
    Ok(())
}

fn validate_correct_option(req: &CreateQuestionRequest) -> Result<(), ValidationError> {
    if !(1..=req.options.len()).contains(&req.correct_option) {
        return Err(ValidationError::new("correct_option_out_of_range")
            .with_message("The correct answer must be one of the given options".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_optional_options_are_dropped() {
        let req = CreateQuestionRequest::new("2+2?", &["3", "4", "", "  "], 2);
        assert_eq!(req.options, vec!["3", "4"]);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn needs_two_options() {
        let req = CreateQuestionRequest::new("2+2?", &["4", ""], 1);
        assert!(req.validate().is_err());
    }

    #[test]
    fn correct_option_must_point_at_an_existing_option() {
        // Picking "Option 4" while only two options were filled in.
        let req = CreateQuestionRequest::new("2+2?", &["3", "4"], 4);
        assert!(req.validate().is_err());

        let req = CreateQuestionRequest::new("2+2?", &["3", "4"], 0);
        assert!(req.validate().is_err());
    }

    #[test]
    fn options_may_not_contain_commas() {
        let req = CreateQuestionRequest::new("Pick one", &["1,5", "2"], 1);
        assert!(req.validate().is_err());
    }

    #[test]
    fn well_formedness() {
        let q = CreateQuestionRequest::new("2+2?", &["3", "4", "5"], 2).into_question();
        assert!(q.is_well_formed());
        assert!(q.is_correct(2));
        assert!(!q.is_correct(1));

        let broken = Question { correct_option: 7, ..q };
        assert!(!broken.is_well_formed());
    }
}
