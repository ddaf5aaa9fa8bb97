//! Swipe voting
//!
//! A [`VotingSession`] holds the statements one voter has not reacted to
//! yet and presents them one at a time. The [`VotingSessionRegistry`] keeps
//! one live session per (poll, voter) for the HTTP layer.

mod registry;
mod session;

pub use registry::{SessionKey, VotingSessionRegistry};
pub use session::{ReactOutcome, SessionSnapshot, SessionState, VotingSession, WriteFailure};

#[cfg(test)]
pub(crate) mod testing;
