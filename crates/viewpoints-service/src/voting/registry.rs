//! Live voting sessions, one per (poll, voter)

use std::sync::{Arc, Weak};
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, instrument};

use viewpoints_core::{
    DomainError, PollId, ResponseSink, Statement, StatementId, StatementRepository, Valence,
    VoterIdentity,
};

use super::session::{ReactOutcome, SessionSnapshot, VotingSession, WriteFailure};

/// Registry key
pub type SessionKey = (PollId, VoterIdentity);

/// Holds the live sessions of every voter
///
/// Operations on one session run under its DashMap shard lock, so a voter's
/// reactions are applied one at a time; different voters do not contend
/// unless they hash to the same shard. Sessions left idle are dropped by
/// [`sweep_idle`](Self::sweep_idle).
pub struct VotingSessionRegistry {
    sessions: DashMap<SessionKey, VotingSession>,
    statements: Arc<dyn StatementRepository>,
    sink: Arc<dyn ResponseSink>,
}

impl VotingSessionRegistry {
    pub fn new(statements: Arc<dyn StatementRepository>, sink: Arc<dyn ResponseSink>) -> Self {
        Self {
            sessions: DashMap::new(),
            statements,
            sink,
        }
    }

    /// Start (or restart) the voter's session over the statements they have
    /// not answered yet, newest on top
    #[instrument(skip(self, voter), fields(voter = %voter))]
    pub async fn start(
        &self,
        poll_id: PollId,
        voter: VoterIdentity,
    ) -> Result<SessionSnapshot, DomainError> {
        let unanswered = self.statements.find_unanswered(poll_id, &voter).await?;
        let session = VotingSession::new(unanswered, voter.clone(), Arc::clone(&self.sink));
        let snapshot = session.snapshot();

        // A replaced session's in-flight writes keep running detached
        if self.sessions.insert((poll_id, voter), session).is_some() {
            debug!(%poll_id, "Replaced existing voting session");
        }
        info!(%poll_id, remaining = snapshot.remaining, "Voting session started");

        Ok(snapshot)
    }

    pub fn view(&self, poll_id: PollId, voter: &VoterIdentity) -> Result<SessionSnapshot, DomainError> {
        self.sessions
            .get_mut(&(poll_id, voter.clone()))
            .map(|mut session| {
                session.touch();
                session.snapshot()
            })
            .ok_or(DomainError::VotingSessionNotFound)
    }

    /// React to the active statement of the voter's session
    pub fn react(
        &self,
        poll_id: PollId,
        voter: &VoterIdentity,
        statement_id: StatementId,
        valence: Valence,
    ) -> Result<(ReactOutcome, usize), DomainError> {
        let mut session = self
            .sessions
            .get_mut(&(poll_id, voter.clone()))
            .ok_or(DomainError::VotingSessionNotFound)?;

        session.touch();
        let outcome = session.react(statement_id, valence)?;
        Ok((outcome, session.remaining()))
    }

    /// Push a new statement onto the voter's session, if one is live
    pub fn append_statement(
        &self,
        poll_id: PollId,
        voter: &VoterIdentity,
        statement: Statement,
    ) -> bool {
        self.sessions
            .get_mut(&(poll_id, voter.clone()))
            .is_some_and(|mut session| {
                session.touch();
                session.append(statement)
            })
    }

    /// Drop a deleted statement from every live session of the poll
    ///
    /// Returns the number of sessions that still had it queued.
    #[instrument(skip(self))]
    pub fn remove_statement(&self, poll_id: PollId, statement_id: StatementId) -> usize {
        let removed = self
            .sessions
            .iter_mut()
            .filter(|entry| entry.key().0 == poll_id)
            .map(|mut entry| entry.value_mut().remove(statement_id))
            .filter(|removed| *removed)
            .count();

        if removed > 0 {
            info!(%poll_id, %statement_id, sessions = removed, "Removed deleted statement from live sessions");
        }
        removed
    }

    pub fn take_failures(
        &self,
        poll_id: PollId,
        voter: &VoterIdentity,
    ) -> Result<Vec<WriteFailure>, DomainError> {
        self.sessions
            .get_mut(&(poll_id, voter.clone()))
            .map(|mut session| {
                session.touch();
                session.take_failures()
            })
            .ok_or(DomainError::VotingSessionNotFound)
    }

    /// Re-queue the statements whose writes failed
    pub fn resurface_failures(
        &self,
        poll_id: PollId,
        voter: &VoterIdentity,
    ) -> Result<SessionSnapshot, DomainError> {
        let mut session = self
            .sessions
            .get_mut(&(poll_id, voter.clone()))
            .ok_or(DomainError::VotingSessionNotFound)?;

        session.touch();
        let requeued = session.resurface_failures();
        if requeued > 0 {
            info!(%poll_id, voter = %voter, requeued, "Re-queued statements with failed writes");
        }
        Ok(session.snapshot())
    }

    /// Drop the voter's session and hand it back
    pub fn end(&self, poll_id: PollId, voter: &VoterIdentity) -> Option<VotingSession> {
        self.sessions
            .remove(&(poll_id, voter.clone()))
            .map(|(_, session)| session)
    }

    /// Drop sessions unused for at least `max_idle`
    ///
    /// Their in-flight writes keep running detached. Returns how many
    /// sessions were dropped.
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        let mut swept = 0;
        self.sessions.retain(|_, session| {
            let keep = session.idle_for() < max_idle;
            if !keep {
                swept += 1;
            }
            keep
        });

        if swept > 0 {
            info!(swept, live = self.sessions.len(), "Swept idle voting sessions");
        }
        swept
    }

    /// Sweep idle sessions periodically until the registry is dropped
    pub fn spawn_sweeper(self: &Arc<Self>, max_idle: Duration) -> JoinHandle<()> {
        let registry: Weak<Self> = Arc::downgrade(self);
        let period = (max_idle / 2).max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(registry) = registry.upgrade() else {
                    debug!("Voting session registry dropped; sweeper exiting");
                    break;
                };
                registry.sweep_idle(max_idle);
            }
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Remove every session and wait for their writes (graceful shutdown)
    pub async fn drain(&self) {
        let keys: Vec<SessionKey> = self.sessions.iter().map(|e| e.key().clone()).collect();
        let mut sessions: Vec<VotingSession> = keys
            .iter()
            .filter_map(|key| self.sessions.remove(key).map(|(_, s)| s))
            .collect();

        info!(count = sessions.len(), "Settling voting sessions");
        for session in &mut sessions {
            session.settle().await;
        }
    }
}

impl std::fmt::Debug for VotingSessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VotingSessionRegistry")
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}
