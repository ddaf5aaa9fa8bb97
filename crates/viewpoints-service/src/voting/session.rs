//! Voting session controller
//!
//! The queue is a stack: the active statement is the last element, and a
//! reaction pops it. Each reaction issues exactly one write to the
//! [`ResponseSink`] on a spawned task and the queue advances without waiting
//! for it. Writes are never retried or cancelled; failures are logged and
//! kept in a buffer the caller can drain or push back onto the queue.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use viewpoints_core::{
    DomainError, IdentityResolver, NewResponse, ResponseSink, Statement, StatementId, Valence,
    VoterIdentity,
};

/// Whether the session still has something to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    HasStatements,
    /// Nothing left to react to; the voter is invited to add a statement
    Exhausted,
}

impl SessionState {
    fn of(queue: &[Statement]) -> Self {
        if queue.is_empty() {
            Self::Exhausted
        } else {
            Self::HasStatements
        }
    }
}

/// Result of a successful reaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactOutcome {
    /// The queue moved on to `next`
    Advanced { next: Statement },
    /// The reacted statement was the last one
    Exhausted,
}

/// A reaction whose write did not make it to the store
#[derive(Debug)]
pub struct WriteFailure {
    pub statement: Statement,
    pub valence: Valence,
    pub error: DomainError,
}

/// Point-in-time view of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub voter: VoterIdentity,
    pub active: Option<Statement>,
    pub remaining: usize,
    pub state: SessionState,
}

/// One voter's swipe queue over a poll's statements
pub struct VotingSession {
    voter: VoterIdentity,
    queue: Vec<Statement>,
    sink: Arc<dyn ResponseSink>,
    state_tx: watch::Sender<SessionState>,
    failures: Arc<Mutex<Vec<WriteFailure>>>,
    in_flight: Vec<JoinHandle<()>>,
    last_touched: Instant,
    /// Statements deleted while this session was live
    removed: HashSet<StatementId>,
}

impl VotingSession {
    /// Start a session over `statements` (last element is shown first)
    pub fn new(statements: Vec<Statement>, voter: VoterIdentity, sink: Arc<dyn ResponseSink>) -> Self {
        let (state_tx, _) = watch::channel(SessionState::of(&statements));
        Self {
            voter,
            queue: statements,
            sink,
            state_tx,
            failures: Arc::new(Mutex::new(Vec::new())),
            in_flight: Vec::new(),
            last_touched: Instant::now(),
            removed: HashSet::new(),
        }
    }

    /// Start a session for whoever `resolver` identifies
    ///
    /// # Errors
    /// `MissingVoterIdentity` if the resolver yields neither a user nor a session
    pub fn for_resolver(
        statements: Vec<Statement>,
        resolver: &dyn IdentityResolver,
        sink: Arc<dyn ResponseSink>,
    ) -> Result<Self, DomainError> {
        let voter = resolver.resolve().ok_or(DomainError::MissingVoterIdentity)?;
        Ok(Self::new(statements, voter, sink))
    }

    pub fn voter(&self) -> &VoterIdentity {
        &self.voter
    }

    /// The statement currently shown
    pub fn active(&self) -> Option<&Statement> {
        self.queue.last()
    }

    /// Statements still to be reacted to, bottom first
    pub fn statements(&self) -> &[Statement] {
        &self.queue
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn state(&self) -> SessionState {
        *self.state_tx.borrow()
    }

    /// Watch state transitions (has-statements <-> exhausted)
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            voter: self.voter.clone(),
            active: self.active().cloned(),
            remaining: self.remaining(),
            state: self.state(),
        }
    }

    /// Mark the session as used by its voter
    pub fn touch(&mut self) {
        self.last_touched = Instant::now();
    }

    /// Time since the voter last used the session
    pub fn idle_for(&self) -> Duration {
        self.last_touched.elapsed()
    }

    /// Number of writes issued that have not completed yet
    pub fn pending_writes(&self) -> usize {
        self.in_flight.iter().filter(|h| !h.is_finished()).count()
    }

    /// React to the active statement
    ///
    /// Issues one write `{statement_id, voter, valence}` and pops the
    /// statement before returning, whatever the write's eventual outcome.
    ///
    /// # Errors
    /// - `QueueExhausted` if there is nothing to react to
    /// - `NotActiveStatement` if `statement_id` is not on top of the queue
    /// - `InternalError` if called outside a tokio runtime
    ///
    /// Nothing is written on error.
    pub fn react(
        &mut self,
        statement_id: StatementId,
        valence: Valence,
    ) -> Result<ReactOutcome, DomainError> {
        match self.queue.last() {
            None => return Err(DomainError::QueueExhausted),
            Some(top) if top.id != statement_id => {
                return Err(DomainError::NotActiveStatement(statement_id))
            }
            Some(_) => {}
        }
        let runtime = Handle::try_current()
            .map_err(|e| DomainError::InternalError(format!("no async runtime: {e}")))?;

        let Some(statement) = self.queue.pop() else {
            return Err(DomainError::QueueExhausted);
        };
        self.spawn_write(&runtime, statement, valence);
        self.publish_state();

        Ok(match self.queue.last() {
            Some(next) => ReactOutcome::Advanced { next: next.clone() },
            None => ReactOutcome::Exhausted,
        })
    }

    /// Push a statement on top of the queue
    ///
    /// Returns `false` (and leaves the queue alone) if it is already queued.
    pub fn append(&mut self, statement: Statement) -> bool {
        if self.queue.iter().any(|s| s.id == statement.id) {
            return false;
        }
        self.queue.push(statement);
        self.publish_state();
        true
    }

    /// Drop a statement from the queue wherever it sits
    ///
    /// Returns `false` if it was not queued. The statement is never
    /// resurfaced afterwards, even if a write for it fails later.
    pub fn remove(&mut self, statement_id: StatementId) -> bool {
        self.removed.insert(statement_id);
        self.failures
            .lock()
            .retain(|failure| failure.statement.id != statement_id);

        let before = self.queue.len();
        self.queue.retain(|s| s.id != statement_id);
        if self.queue.len() == before {
            return false;
        }
        self.publish_state();
        true
    }

    /// Drain the failed writes recorded so far
    pub fn take_failures(&self) -> Vec<WriteFailure> {
        std::mem::take(&mut *self.failures.lock())
    }

    /// Put the statements of failed writes back on top of the queue
    ///
    /// Returns how many statements were re-queued; the failures are consumed.
    pub fn resurface_failures(&mut self) -> usize {
        self.take_failures()
            .into_iter()
            .filter(|failure| !self.removed.contains(&failure.statement.id))
            .collect::<Vec<_>>()
            .into_iter()
            .filter(|failure| self.append(failure.statement.clone()))
            .count()
    }

    /// Wait for every issued write to finish
    pub async fn settle(&mut self) {
        for handle in self.in_flight.drain(..) {
            if let Err(e) = handle.await {
                warn!(voter = %self.voter, error = %e, "Response write task did not complete");
            }
        }
    }

    fn spawn_write(&mut self, runtime: &Handle, statement: Statement, valence: Valence) {
        self.in_flight.retain(|h| !h.is_finished());

        let payload = NewResponse::new(statement.id, self.voter.clone(), valence);
        let sink = Arc::clone(&self.sink);
        let failures = Arc::clone(&self.failures);

        let handle = runtime.spawn(async move {
            match sink.record(&payload).await {
                Ok(response) => debug!(
                    response_id = %response.id,
                    statement_id = %payload.statement_id,
                    voter = %payload.voter,
                    "Response recorded"
                ),
                Err(error) => {
                    warn!(
                        statement_id = %payload.statement_id,
                        voter = %payload.voter,
                        valence = %valence,
                        error = %error,
                        "Failed to record response"
                    );
                    failures.lock().push(WriteFailure {
                        statement,
                        valence,
                        error,
                    });
                }
            }
        });
        self.in_flight.push(handle);
    }

    fn publish_state(&self) {
        let next = SessionState::of(&self.queue);
        self.state_tx.send_if_modified(|state| {
            let changed = *state != next;
            *state = next;
            changed
        });
    }
}

impl std::fmt::Debug for VotingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VotingSession")
            .field("voter", &self.voter)
            .field("remaining", &self.queue.len())
            .field("state", &self.state())
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voting::testing::{statement, statements, RecordingSink};
    use std::time::Duration;
    use viewpoints_core::ResolvedIdentity;

    fn voter() -> VoterIdentity {
        VoterIdentity::Session("voter-a".into())
    }

    fn session_over(n: i64, sink: &Arc<RecordingSink>) -> VotingSession {
        VotingSession::new(statements(1..=n), voter(), sink.clone())
    }

    #[tokio::test]
    async fn test_n_reactions_drain_queue_of_n() {
        for n in 0..6 {
            let sink = Arc::new(RecordingSink::new());
            let mut session = session_over(n, &sink);

            for (i, valence) in Valence::ALL.iter().cycle().take(n as usize).enumerate() {
                let top = session.active().unwrap().id;
                session.react(top, *valence).unwrap();
                assert_eq!(session.remaining(), n as usize - i - 1);
            }

            assert!(session.is_exhausted());
            session.settle().await;
            assert_eq!(sink.recorded().len(), n as usize);
        }
    }

    #[tokio::test]
    async fn test_react_pops_top_and_writes_once() {
        let sink = Arc::new(RecordingSink::new());
        let mut session = session_over(3, &sink);

        let outcome = session.react(StatementId::new(3), Valence::Skip).unwrap();

        assert_eq!(
            outcome,
            ReactOutcome::Advanced {
                next: statement(2)
            }
        );
        let ids: Vec<i64> = session.statements().iter().map(|s| s.id.into_inner()).collect();
        assert_eq!(ids, vec![1, 2]);

        session.settle().await;
        assert_eq!(
            sink.recorded(),
            vec![NewResponse::new(StatementId::new(3), voter(), Valence::Skip)]
        );
    }

    #[tokio::test]
    async fn test_write_payload_matches_reaction() {
        let sink = Arc::new(RecordingSink::new());
        let alice = VoterIdentity::User("user_alice".into());
        let mut session = VotingSession::new(vec![statement(42)], alice.clone(), sink.clone());

        session.react(StatementId::new(42), Valence::Agree).unwrap();

        assert!(session.statements().iter().all(|s| s.id != StatementId::new(42)));
        session.settle().await;
        let recorded = sink.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].statement_id, StatementId::new(42));
        assert_eq!(recorded[0].voter, alice);
        assert_eq!(recorded[0].valence, Valence::Agree);
    }

    #[tokio::test]
    async fn test_last_reaction_signals_exhaustion() {
        let sink = Arc::new(RecordingSink::new());
        let mut session = session_over(1, &sink);
        let mut rx = session.subscribe();
        assert_eq!(*rx.borrow_and_update(), SessionState::HasStatements);

        let outcome = session.react(StatementId::new(1), Valence::Disagree).unwrap();

        assert_eq!(outcome, ReactOutcome::Exhausted);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), SessionState::Exhausted);
        assert_eq!(session.state(), SessionState::Exhausted);
    }

    #[tokio::test]
    async fn test_empty_start_is_exhausted() {
        let sink = Arc::new(RecordingSink::new());
        let mut session = session_over(0, &sink);

        assert_eq!(session.state(), SessionState::Exhausted);
        assert!(session.active().is_none());
        assert!(matches!(
            session.react(StatementId::new(1), Valence::Agree),
            Err(DomainError::QueueExhausted)
        ));
        session.settle().await;
        assert!(sink.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_non_top_statement_is_rejected_without_write() {
        let sink = Arc::new(RecordingSink::new());
        let mut session = session_over(3, &sink);

        let err = session.react(StatementId::new(1), Valence::Agree).unwrap_err();

        assert!(matches!(err, DomainError::NotActiveStatement(id) if id == StatementId::new(1)));
        assert_eq!(session.remaining(), 3);
        session.settle().await;
        assert!(sink.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_queue_advances_while_write_hangs() {
        let sink = Arc::new(RecordingSink::hanging());
        let mut session = session_over(2, &sink);

        session.react(StatementId::new(2), Valence::Agree).unwrap();
        session.react(StatementId::new(1), Valence::Agree).unwrap();

        assert!(session.is_exhausted());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(sink.attempts(), 2);
        assert_eq!(session.pending_writes(), 2);
        assert!(sink.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_still_advances_and_is_buffered() {
        let sink = Arc::new(RecordingSink::failing());
        let mut session = session_over(2, &sink);

        session.react(StatementId::new(2), Valence::Disagree).unwrap();
        assert_eq!(session.remaining(), 1);

        session.settle().await;
        assert_eq!(sink.attempts(), 1);

        let failures = session.take_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].statement.id, StatementId::new(2));
        assert_eq!(failures[0].valence, Valence::Disagree);
        assert!(matches!(failures[0].error, DomainError::DatabaseError(_)));

        assert!(session.take_failures().is_empty());
    }

    #[tokio::test]
    async fn test_resurface_failures_requeues_on_top() {
        let sink = Arc::new(RecordingSink::failing());
        let mut session = session_over(1, &sink);
        let mut rx = session.subscribe();

        session.react(StatementId::new(1), Valence::Agree).unwrap();
        session.settle().await;
        assert_eq!(*rx.borrow_and_update(), SessionState::Exhausted);

        assert_eq!(session.resurface_failures(), 1);
        assert_eq!(session.active().map(|s| s.id), Some(StatementId::new(1)));
        assert_eq!(*rx.borrow_and_update(), SessionState::HasStatements);

        // Nothing left to resurface
        assert_eq!(session.resurface_failures(), 0);
    }

    #[tokio::test]
    async fn test_append_revives_exhausted_session() {
        let sink = Arc::new(RecordingSink::new());
        let mut session = session_over(0, &sink);

        assert!(session.append(statement(7)));
        assert!(!session.append(statement(7)));

        assert_eq!(session.state(), SessionState::HasStatements);
        assert_eq!(session.remaining(), 1);
        assert_eq!(session.active().map(|s| s.id), Some(StatementId::new(7)));
    }

    #[tokio::test]
    async fn test_each_reaction_is_one_attempt_even_when_failing() {
        let sink = Arc::new(RecordingSink::failing());
        let mut session = session_over(4, &sink);

        for id in (1..=4).rev() {
            session.react(StatementId::new(id), Valence::Skip).unwrap();
        }
        session.settle().await;

        assert_eq!(sink.attempts(), 4);
        assert_eq!(session.take_failures().len(), 4);
    }

    #[test]
    fn test_for_resolver_requires_identity() {
        let sink: Arc<dyn ResponseSink> = Arc::new(RecordingSink::new());

        let anonymous = ResolvedIdentity::new(None, None);
        let err = VotingSession::for_resolver(vec![], &anonymous, sink.clone()).unwrap_err();
        assert!(matches!(err, DomainError::MissingVoterIdentity));

        let both = ResolvedIdentity::new(Some("user_1".into()), Some("sess".into()));
        let session = VotingSession::for_resolver(vec![], &both, sink).unwrap();
        assert_eq!(session.voter(), &VoterIdentity::User("user_1".into()));
    }

    #[test]
    fn test_react_outside_runtime_writes_nothing() {
        let sink = Arc::new(RecordingSink::new());
        let mut session = session_over(1, &sink);

        let err = session.react(StatementId::new(1), Valence::Agree).unwrap_err();

        assert!(matches!(err, DomainError::InternalError(_)));
        assert_eq!(session.remaining(), 1);
        assert_eq!(sink.attempts(), 0);
    }

    #[test]
    fn test_remove_from_middle_and_top() {
        let sink = Arc::new(RecordingSink::new());
        let mut session = session_over(3, &sink);

        assert!(session.remove(StatementId::new(2)));
        assert!(!session.remove(StatementId::new(2)));
        let ids: Vec<i64> = session.statements().iter().map(|s| s.id.into_inner()).collect();
        assert_eq!(ids, vec![1, 3]);

        assert!(session.remove(StatementId::new(3)));
        assert_eq!(session.active().map(|s| s.id), Some(StatementId::new(1)));
    }

    #[test]
    fn test_removing_last_statement_signals_exhaustion() {
        let sink = Arc::new(RecordingSink::new());
        let mut session = session_over(1, &sink);
        let mut rx = session.subscribe();
        rx.borrow_and_update();

        assert!(session.remove(StatementId::new(1)));

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow(), SessionState::Exhausted);
        assert_eq!(session.state(), SessionState::Exhausted);
    }

    #[tokio::test]
    async fn test_removed_statement_is_not_resurfaced() {
        let sink = Arc::new(RecordingSink::failing());
        let mut session = session_over(2, &sink);

        session.react(StatementId::new(2), Valence::Agree).unwrap();
        // Deleted while its write is still in flight
        assert!(!session.remove(StatementId::new(2)));
        session.settle().await;

        assert_eq!(session.resurface_failures(), 0);
        assert_eq!(session.active().map(|s| s.id), Some(StatementId::new(1)));
    }

    #[test]
    fn test_touch_resets_idle_time() {
        let sink = Arc::new(RecordingSink::new());
        let mut session = session_over(1, &sink);

        std::thread::sleep(Duration::from_millis(20));
        assert!(session.idle_for() >= Duration::from_millis(20));

        session.touch();
        assert!(session.idle_for() < Duration::from_millis(20));
    }
}
