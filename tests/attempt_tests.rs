// tests/attempt_tests.rs

use std::time::Duration;

use quizdesk::{
    attempt::{
        Attempt, Progress,
        runner::{self, AttemptEvent},
    },
    error::AppError,
    models::question::Question,
};
use tokio::time::{self, Instant};

fn questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| Question {
            text: format!("Question {}", i + 1),
            options: vec!["A".to_string(), "B".to_string(), "C".to_string(), "D".to_string()],
            correct_option: 1 + i % 4,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn unanswered_attempt_times_out() {
    // Arrange
    let attempt = Attempt::new("alice", "Q1", questions(3), 1).unwrap();
    let start = Instant::now();
    let (_handle, mut events) = runner::spawn(attempt).unwrap();

    // Act
    let mut ticks = Vec::new();
    let outcome = loop {
        match events.recv().await.expect("runner ended without completing") {
            AttemptEvent::Tick { seconds_remaining } => ticks.push(seconds_remaining),
            AttemptEvent::Completed(outcome) => break outcome,
        }
    };

    // Assert
    assert!(outcome.timed_out);
    assert_eq!(outcome.result.score, 0);
    assert_eq!(outcome.percent, 0);
    assert_eq!(ticks.len(), 59);
    assert_eq!(ticks.first(), Some(&59));
    assert_eq!(ticks.last(), Some(&1));
    assert_eq!(start.elapsed(), Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn timeout_keeps_answers_given_so_far() {
    // Arrange
    let qs = questions(4);
    let first_two: Vec<usize> = qs.iter().take(2).map(|q| q.correct_option).collect();
    let attempt = Attempt::new("alice", "Q1", qs, 1).unwrap();
    let (handle, mut events) = runner::spawn(attempt).unwrap();

    // Act
    for answer in first_two {
        handle.submit_answer(Some(answer)).await.unwrap();
    }
    time::sleep(Duration::from_secs(30)).await;
    handle.submit_answer(Some(4)).await.unwrap();

    let outcome = loop {
        if let Some(AttemptEvent::Completed(outcome)) = events.recv().await {
            break outcome;
        }
    };

    // Assert
    assert!(outcome.timed_out);
    assert_eq!(outcome.result.score, 2);
    assert_eq!(outcome.result.total_questions, 4);
    assert_eq!(outcome.percent, 50);
}

#[tokio::test(start_paused = true)]
async fn submits_after_completion_are_refused() {
    // Arrange
    let attempt = Attempt::new("alice", "Q1", questions(1), 1).unwrap();
    let (handle, mut events) = runner::spawn(attempt).unwrap();

    // Act
    let progress = handle.submit_answer(Some(1)).await.unwrap();
    assert!(matches!(progress, Progress::Completed(_)));
    let event = events.recv().await;

    // Assert
    assert!(matches!(event, Some(AttemptEvent::Completed(_))));
    let err = handle.submit_answer(Some(1)).await.unwrap_err();
    assert!(matches!(err, AppError::AttemptClosed));

    // The countdown stopped with the attempt.
    time::sleep(Duration::from_secs(120)).await;
    assert!(events.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn missing_answer_is_rejected_without_advancing() {
    let attempt = Attempt::new("alice", "Q1", questions(2), 1).unwrap();
    let (handle, _events) = runner::spawn(attempt).unwrap();

    let err = handle.submit_answer(None).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let progress = handle.submit_answer(Some(1)).await.unwrap();
    assert_eq!(progress, Progress::Next { question_index: 1 });
}

#[tokio::test(start_paused = true)]
async fn ticks_report_remaining_seconds() {
    let attempt = Attempt::new("alice", "Q1", questions(2), 2).unwrap();
    let (_handle, mut events) = runner::spawn(attempt).unwrap();

    assert_eq!(events.recv().await, Some(AttemptEvent::Tick { seconds_remaining: 119 }));
    assert_eq!(events.recv().await, Some(AttemptEvent::Tick { seconds_remaining: 118 }));
}
