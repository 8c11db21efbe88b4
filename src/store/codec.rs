// src/store/codec.rs

//! Single-line text encodings for every stored record kind.
//!
//! Decoding never fails loudly: a line with too few fields, an unparsable
//! number, or values that break a record invariant simply yields `None`.

use chrono::NaiveDateTime;

use crate::{
    config::TIMESTAMP_FORMAT,
    models::{
        question::Question,
        quiz::{MAX_TIMER_MINUTES, Quiz},
        quiz_result::QuizResult,
        user::User,
    },
    utils::time::now,
};

/// A record with a fixed field order and field delimiter.
pub trait LineRecord: Sized {
    const DELIMITER: char;

    fn encode(&self) -> String;

    fn decode(line: &str) -> Option<Self>;
}

fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).ok()
}

fn fields(line: &str, delimiter: char) -> Vec<&str> {
    line.split(delimiter).collect()
}

impl LineRecord for User {
    const DELIMITER: char = ';';

    fn encode(&self) -> String {
        format!(
            "{};{};{};{};{};{}",
            self.username,
            self.password,
            self.full_name,
            format_timestamp(&self.last_login),
            self.quizzes_taken,
            self.high_score
        )
    }

    fn decode(line: &str) -> Option<Self> {
        let parts = fields(line, Self::DELIMITER);
        if parts.len() < 6 {
            return None;
        }
        let high_score: u32 = parts[5].trim().parse().ok()?;
        if high_score > 100 {
            return None;
        }
        Some(User {
            username: parts[0].to_string(),
            password: parts[1].to_string(),
            full_name: parts[2].to_string(),
            last_login: parse_timestamp(parts[3])?,
            quizzes_taken: parts[4].trim().parse().ok()?,
            high_score,
        })
    }
}

impl LineRecord for Quiz {
    const DELIMITER: char = ':';

    fn encode(&self) -> String {
        format!("{}:{}:{}:{}", self.code, self.name, self.subject, self.timer_minutes)
    }

    fn decode(line: &str) -> Option<Self> {
        let parts = fields(line, Self::DELIMITER);
        if parts.len() < 4 {
            return None;
        }
        let timer_minutes: u32 = parts[3].trim().parse().ok()?;
        if timer_minutes == 0 || timer_minutes > MAX_TIMER_MINUTES {
            return None;
        }
        Some(Quiz {
            code: parts[0].to_string(),
            name: parts[1].to_string(),
            subject: parts[2].to_string(),
            timer_minutes,
        })
    }
}

impl LineRecord for Question {
    const DELIMITER: char = ';';

    fn encode(&self) -> String {
        format!("{};{};{}", self.text, self.options.join(","), self.correct_option)
    }

    fn decode(line: &str) -> Option<Self> {
        let parts = fields(line, Self::DELIMITER);
        if parts.len() < 3 {
            return None;
        }
        let question = Question {
            text: parts[0].to_string(),
            options: parts[1].split(',').map(str::to_string).collect(),
            correct_option: parts[2].trim().parse().ok()?,
        };
        question.is_well_formed().then_some(question)
    }
}

impl LineRecord for QuizResult {
    const DELIMITER: char = ';';

    fn encode(&self) -> String {
        format!(
            "{};{};{};{};{}",
            self.username,
            self.quiz_code,
            self.score,
            self.total_questions,
            format_timestamp(&self.timestamp)
        )
    }

    /// A missing or damaged timestamp falls back to the load time instead of dropping the row.
    fn decode(line: &str) -> Option<Self> {
        let parts = fields(line, Self::DELIMITER);
        if parts.len() < 4 {
            return None;
        }
        let score: u32 = parts[2].trim().parse().ok()?;
        let total_questions: u32 = parts[3].trim().parse().ok()?;
        if total_questions == 0 || score > total_questions {
            return None;
        }
        let timestamp = parts.get(4).and_then(|raw| parse_timestamp(raw)).unwrap_or_else(now);
        Some(QuizResult {
            username: parts[0].to_string(),
            quiz_code: parts[1].to_string(),
            score,
            total_questions,
            timestamp,
        })
    }
}
