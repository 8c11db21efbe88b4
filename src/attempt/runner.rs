// src/attempt/runner.rs

//! Drives an [`Attempt`] on its own task.
//!
//! The task is the only owner of the attempt, so a tick and a submit are never
//! handled at the same time. It stops once the attempt reaches a terminal state.

use tokio::{
    sync::{mpsc, oneshot},
    time::{self, Instant, MissedTickBehavior},
};

use super::{Attempt, AttemptOutcome, AttemptState, Progress};
use crate::{config::TICK_PERIOD, error::AppError};

/// Notifications pushed to whoever displays the attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptEvent {
    Tick { seconds_remaining: u32 },
    Completed(AttemptOutcome),
}

struct Submit {
    selected: Option<usize>,
    reply: oneshot::Sender<Result<Progress, AppError>>,
}

/// Sends answers to a running attempt.
#[derive(Debug, Clone)]
pub struct AttemptHandle {
    commands: mpsc::Sender<Submit>,
}

impl AttemptHandle {
    /// Submits a 1-based option for the current question.
    ///
    /// Fails with `AttemptClosed` once the attempt has finished or timed out.
    pub async fn submit_answer(&self, selected: Option<usize>) -> Result<Progress, AppError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Submit { selected, reply })
            .await
            .map_err(|_| AppError::AttemptClosed)?;
        response.await.map_err(|_| AppError::AttemptClosed)?
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

impl std::fmt::Debug for Submit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Submit").field("selected", &self.selected).finish()
    }
}

/// Starts the attempt and its countdown. Must be called inside a tokio runtime.
pub fn spawn(mut attempt: Attempt) -> Result<(AttemptHandle, mpsc::UnboundedReceiver<AttemptEvent>), AppError> {
    attempt.start()?;

    let (commands, mut rx) = mpsc::channel::<Submit>(1);
    let (events, events_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
        let mut accepting = true;

        let outcome = loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Some(outcome) = attempt.tick() {
                        break outcome;
                    }
                    if let AttemptState::InProgress { seconds_remaining, .. } = attempt.state() {
                        let _ = events.send(AttemptEvent::Tick { seconds_remaining });
                    }
                }
                submit = rx.recv(), if accepting => {
                    // Every handle is gone; let the countdown run out on its own.
                    let Some(Submit { selected, reply }) = submit else {
                        accepting = false;
                        continue;
                    };
                    let progress = attempt.submit(selected);
                    let finished = match &progress {
                        Ok(Progress::Completed(outcome)) => Some(outcome.clone()),
                        _ => None,
                    };
                    let _ = reply.send(progress);
                    if let Some(outcome) = finished {
                        break outcome;
                    }
                }
            }
        };

        let _ = events.send(AttemptEvent::Completed(outcome));
    });

    Ok((AttemptHandle { commands }, events_rx))
}
