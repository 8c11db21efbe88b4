// src/attempt/mod.rs

//! The state machine for one timed run through a quiz.
//!
//! `Attempt` knows nothing about clocks or files: callers feed it ticks and
//! answers, and it hands back an [`AttemptOutcome`] once it reaches a terminal
//! state. Scheduling lives in [`runner`], persistence in the handlers.

pub mod runner;

use serde::Serialize;

use crate::{
    error::AppError,
    models::{
        question::Question,
        quiz::MAX_TIMER_MINUTES,
        quiz_result::{QuizResult, percent},
    },
    utils::time::now,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttemptState {
    NotStarted,
    InProgress {
        question_index: usize,
        correct_count: u32,
        seconds_remaining: u32,
    },
    Finished {
        final_percent: u32,
    },
    TimedOut {
        final_percent: u32,
    },
}

/// Emitted exactly once, when the attempt ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptOutcome {
    pub result: QuizResult,
    pub percent: u32,
    pub timed_out: bool,
}

/// What a successful submit leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    Next { question_index: usize },
    Completed(AttemptOutcome),
}

#[derive(Debug)]
pub struct Attempt {
    username: String,
    quiz_code: String,
    questions: Vec<Question>,
    timer_minutes: u32,
    state: AttemptState,
}

impl Attempt {
    /// Refuses empty quizzes, zero timers and timers longer than a day.
    pub fn new(
        username: impl Into<String>,
        quiz_code: impl Into<String>,
        questions: Vec<Question>,
        timer_minutes: u32,
    ) -> Result<Self, AppError> {
        if questions.is_empty() {
            return Err(AppError::BadRequest("This quiz has no questions".to_string()));
        }
        if timer_minutes == 0 || timer_minutes > MAX_TIMER_MINUTES {
            return Err(AppError::BadRequest(format!(
                "Timer must be between 1 and {MAX_TIMER_MINUTES} minutes"
            )));
        }
        Ok(Self {
            username: username.into(),
            quiz_code: quiz_code.into(),
            questions,
            timer_minutes,
            state: AttemptState::NotStarted,
        })
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, AttemptState::Finished { .. } | AttemptState::TimedOut { .. })
    }

    /// The question awaiting an answer, if the attempt is running.
    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            AttemptState::InProgress { question_index, .. } => self.questions.get(question_index),
            _ => None,
        }
    }

    pub fn start(&mut self) -> Result<(), AppError> {
        match self.state {
            AttemptState::NotStarted => {
                self.state = AttemptState::InProgress {
                    question_index: 0,
                    correct_count: 0,
                    seconds_remaining: self.timer_minutes.saturating_mul(60),
                };
                Ok(())
            }
            AttemptState::InProgress { .. } => {
                Err(AppError::BadRequest("The quiz attempt has already started".to_string()))
            }
            _ => Err(AppError::AttemptClosed),
        }
    }

    /// One elapsed second. Returns the outcome when the countdown runs out.
    ///
    /// Ticks outside `InProgress` are ignored.
    pub fn tick(&mut self) -> Option<AttemptOutcome> {
        let AttemptState::InProgress {
            question_index,
            correct_count,
            seconds_remaining,
        } = self.state
        else {
            return None;
        };

        let seconds_remaining = seconds_remaining.saturating_sub(1);
        if seconds_remaining == 0 {
            return Some(self.finalize(correct_count, true));
        }
        self.state = AttemptState::InProgress {
            question_index,
            correct_count,
            seconds_remaining,
        };
        None
    }

    /// Answers the current question with a 1-based option.
    ///
    /// `None` or an option the question does not have is rejected without changing state.
    pub fn submit(&mut self, selected: Option<usize>) -> Result<Progress, AppError> {
        let AttemptState::InProgress {
            question_index,
            correct_count,
            seconds_remaining,
        } = self.state
        else {
            return Err(match self.state {
                AttemptState::NotStarted => {
                    AppError::BadRequest("The quiz attempt has not started".to_string())
                }
                _ => AppError::AttemptClosed,
            });
        };

        let question = &self.questions[question_index];
        let selected = selected.ok_or_else(|| AppError::BadRequest("Please select an answer".to_string()))?;
        if !(1..=question.options.len()).contains(&selected) {
            return Err(AppError::BadRequest(format!(
                "Please select an option between 1 and {}",
                question.options.len()
            )));
        }

        let correct_count = correct_count + u32::from(question.is_correct(selected));
        let question_index = question_index + 1;
        if question_index == self.questions.len() {
            return Ok(Progress::Completed(self.finalize(correct_count, false)));
        }

        self.state = AttemptState::InProgress {
            question_index,
            correct_count,
            seconds_remaining,
        };
        Ok(Progress::Next { question_index })
    }

    fn finalize(&mut self, correct_count: u32, timed_out: bool) -> AttemptOutcome {
        let total = self.questions.len() as u32;
        let final_percent = percent(correct_count, total);
        self.state = if timed_out {
            AttemptState::TimedOut { final_percent }
        } else {
            AttemptState::Finished { final_percent }
        };
        tracing::info!(
            "Attempt by {} on {} ended: {}/{} ({}%){}",
            self.username,
            self.quiz_code,
            correct_count,
            total,
            final_percent,
            if timed_out { ", time ran out" } else { "" }
        );
        AttemptOutcome {
            result: QuizResult {
                username: self.username.clone(),
                quiz_code: self.quiz_code.clone(),
                score: correct_count,
                total_questions: total,
                timestamp: now(),
            },
            percent: final_percent,
            timed_out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, correct_option: usize) -> Question {
        Question {
            text: text.to_string(),
            options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            correct_option,
        }
    }

    fn started(questions: Vec<Question>, minutes: u32) -> Attempt {
        let mut attempt = Attempt::new("alice", "Q1", questions, minutes).unwrap();
        attempt.start().unwrap();
        attempt
    }

    #[test]
    fn empty_quiz_is_rejected() {
        let err = Attempt::new("alice", "Q1", Vec::new(), 1).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn oversized_timer_is_rejected() {
        let err = Attempt::new("alice", "Q1", vec![question("q1", 1)], 80_000_000).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let longest = started(vec![question("q1", 1)], MAX_TIMER_MINUTES);
        assert!(matches!(
            longest.state(),
            AttemptState::InProgress { seconds_remaining: 86_400, .. }
        ));
    }

    #[test]
    fn start_sets_the_countdown() {
        let attempt = started(vec![question("q1", 1)], 2);
        assert_eq!(
            attempt.state(),
            AttemptState::InProgress {
                question_index: 0,
                correct_count: 0,
                seconds_remaining: 120
            }
        );
    }

    #[test]
    fn all_correct_takes_one_submit_per_question() {
        let questions = vec![question("q1", 1), question("q2", 3), question("q3", 2)];
        let mut attempt = started(questions.clone(), 5);

        let mut submits = 0;
        let outcome = loop {
            let answer = attempt.current_question().unwrap().correct_option;
            submits += 1;
            match attempt.submit(Some(answer)).unwrap() {
                Progress::Next { question_index } => assert_eq!(question_index, submits),
                Progress::Completed(outcome) => break outcome,
            }
        };

        assert_eq!(submits, questions.len());
        assert_eq!(outcome.percent, 100);
        assert!(!outcome.timed_out);
        assert_eq!(outcome.result.score, 3);
        assert_eq!(outcome.result.total_questions, 3);
        assert_eq!(attempt.state(), AttemptState::Finished { final_percent: 100 });
    }

    #[test]
    fn single_question_quiz_needs_one_submit() {
        let mut attempt = started(vec![question("q1", 2)], 1);
        let progress = attempt.submit(Some(1)).unwrap();
        let Progress::Completed(outcome) = progress else {
            panic!("expected completion");
        };
        assert_eq!(outcome.percent, 0);
        assert_eq!(outcome.result.score, 0);
    }

    #[test]
    fn percent_is_floored() {
        let mut attempt = started(vec![question("q1", 1), question("q2", 1), question("q3", 1)], 1);
        attempt.submit(Some(1)).unwrap();
        attempt.submit(Some(1)).unwrap();
        let Progress::Completed(outcome) = attempt.submit(Some(2)).unwrap() else {
            panic!("expected completion");
        };
        assert_eq!(outcome.percent, 66);
    }

    #[test]
    fn missing_or_invalid_option_changes_nothing() {
        let mut attempt = started(vec![question("q1", 1), question("q2", 1)], 1);
        let before = attempt.state();

        assert!(matches!(attempt.submit(None), Err(AppError::BadRequest(_))));
        assert!(matches!(attempt.submit(Some(0)), Err(AppError::BadRequest(_))));
        assert!(matches!(attempt.submit(Some(4)), Err(AppError::BadRequest(_))));
        assert_eq!(attempt.state(), before);
    }

    #[test]
    fn countdown_expiry_times_out_with_partial_score() {
        let mut attempt = started(vec![question("q1", 1), question("q2", 1), question("q3", 1)], 1);
        attempt.submit(Some(1)).unwrap();

        for _ in 0..59 {
            assert!(attempt.tick().is_none());
        }
        let outcome = attempt.tick().expect("60th tick ends the attempt");
        assert!(outcome.timed_out);
        assert_eq!(outcome.result.score, 1);
        assert_eq!(outcome.result.total_questions, 3);
        assert_eq!(outcome.percent, 33);
        assert_eq!(attempt.state(), AttemptState::TimedOut { final_percent: 33 });
    }

    #[test]
    fn terminal_state_ignores_ticks_and_rejects_submits() {
        let mut attempt = started(vec![question("q1", 1)], 1);
        attempt.submit(Some(1)).unwrap();

        assert!(attempt.tick().is_none());
        assert!(matches!(attempt.submit(Some(1)), Err(AppError::AttemptClosed)));
        assert!(matches!(attempt.start(), Err(AppError::AttemptClosed)));
        assert_eq!(attempt.state(), AttemptState::Finished { final_percent: 100 });
    }

    #[test]
    fn nothing_happens_before_start() {
        let mut attempt = Attempt::new("alice", "Q1", vec![question("q1", 1)], 1).unwrap();
        assert!(attempt.tick().is_none());
        assert!(matches!(attempt.submit(Some(1)), Err(AppError::BadRequest(_))));
        assert_eq!(attempt.state(), AttemptState::NotStarted);
    }
}
