//! Resend countdown driver
//!
//! The controller only reacts to `tick()`; this task supplies one tick per
//! second for as long as the session stays open.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use super::challenge_session::ChallengeSession;
use super::wait_until_closed;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background task ticking a session once per second
#[derive(Debug)]
pub struct CountdownDriver {
    handle: JoinHandle<()>,
}

impl CountdownDriver {
    /// Start ticking `session`; stops on teardown or drop
    pub fn spawn(session: Arc<ChallengeSession>) -> Self {
        let mut closed = session.closed_watch();
        let handle = tokio::spawn(async move {
            let mut ticker = interval(TICK_PERIOD);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => session.tick(),
                    _ = wait_until_closed(&mut closed) => break,
                }
            }
            debug!(challenge_id = %session.challenge_id(), "Countdown stopped");
        });
        Self { handle }
    }

    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for CountdownDriver {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
