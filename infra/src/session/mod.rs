//! Challenge hosting for the verification screens

use tokio::sync::watch;

pub mod challenge_session;
pub mod countdown;

pub use challenge_session::{normalize_destination, ChallengeSession, SharedController};
pub use countdown::CountdownDriver;

#[cfg(test)]
mod tests;

/// Resolve once the session's closed flag is set
pub(crate) async fn wait_until_closed(closed: &mut watch::Receiver<bool>) {
    let _ = closed.wait_for(|closed| *closed).await;
}
