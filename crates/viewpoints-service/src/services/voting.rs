//! Voting service
//!
//! Slug-addressed front for the voting session registry.

use tracing::{info, instrument};
use viewpoints_core::{DomainError, IdentityResolver, Poll, VoterIdentity};

use crate::dto::{
    voting_session_response, ReactRequest, ReactResponse, StatementResponse,
    VotingSessionResponse, WriteFailureResponse,
};
use crate::voting::ReactOutcome;

use super::authz::require_poll_admin_if_private;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::poll::PollService;

/// Voting service
pub struct VotingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VotingService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Start (or restart) the caller's voting session on a poll
    #[instrument(skip(self, identity))]
    pub async fn start(
        &self,
        slug: &str,
        identity: &dyn IdentityResolver,
    ) -> ServiceResult<VotingSessionResponse> {
        let (poll, voter) = self.poll_and_voter(slug, identity).await?;
        let snapshot = self.ctx.sessions().start(poll.id, voter).await?;
        Ok(voting_session_response(poll.id.into_inner(), &snapshot))
    }

    /// The caller's current session
    #[instrument(skip(self, identity))]
    pub async fn current(
        &self,
        slug: &str,
        identity: &dyn IdentityResolver,
    ) -> ServiceResult<VotingSessionResponse> {
        let (poll, voter) = self.poll_and_voter(slug, identity).await?;
        let snapshot = self.ctx.sessions().view(poll.id, &voter)?;
        Ok(voting_session_response(poll.id.into_inner(), &snapshot))
    }

    /// React to the active statement
    ///
    /// The statement leaves the queue before its write completes.
    #[instrument(skip(self, identity, request))]
    pub async fn react(
        &self,
        slug: &str,
        identity: &dyn IdentityResolver,
        request: ReactRequest,
    ) -> ServiceResult<ReactResponse> {
        let (poll, voter) = self.poll_and_voter(slug, identity).await?;
        let (outcome, remaining) =
            self.ctx
                .sessions()
                .react(poll.id, &voter, request.statement_id, request.valence)?;

        let response = match outcome {
            ReactOutcome::Advanced { next } => ReactResponse {
                next: Some(StatementResponse::from(next)),
                remaining,
                exhausted: false,
            },
            ReactOutcome::Exhausted => {
                info!(poll_id = %poll.id, voter = %voter, "Voter reached the end of the poll");
                ReactResponse {
                    next: None,
                    remaining,
                    exhausted: true,
                }
            }
        };
        Ok(response)
    }

    /// Drain the writes that failed since the last call
    #[instrument(skip(self, identity))]
    pub async fn failures(
        &self,
        slug: &str,
        identity: &dyn IdentityResolver,
    ) -> ServiceResult<Vec<WriteFailureResponse>> {
        let (poll, voter) = self.poll_and_voter(slug, identity).await?;
        let failures = self.ctx.sessions().take_failures(poll.id, &voter)?;
        Ok(failures.into_iter().map(WriteFailureResponse::from).collect())
    }

    /// Put statements whose writes failed back on top of the queue
    #[instrument(skip(self, identity))]
    pub async fn resurface(
        &self,
        slug: &str,
        identity: &dyn IdentityResolver,
    ) -> ServiceResult<VotingSessionResponse> {
        let (poll, voter) = self.poll_and_voter(slug, identity).await?;
        let snapshot = self.ctx.sessions().resurface_failures(poll.id, &voter)?;
        Ok(voting_session_response(poll.id.into_inner(), &snapshot))
    }

    /// End the caller's session; in-flight writes still complete
    #[instrument(skip(self, identity))]
    pub async fn end(&self, slug: &str, identity: &dyn IdentityResolver) -> ServiceResult<()> {
        let (poll, voter) = self.poll_and_voter(slug, identity).await?;
        let session = self
            .ctx
            .sessions()
            .end(poll.id, &voter)
            .ok_or(DomainError::VotingSessionNotFound)?;

        info!(
            poll_id = %poll.id,
            voter = %voter,
            pending_writes = session.pending_writes(),
            "Voting session ended"
        );
        Ok(())
    }

    async fn poll_and_voter(
        &self,
        slug: &str,
        identity: &dyn IdentityResolver,
    ) -> ServiceResult<(Poll, VoterIdentity)> {
        let voter = identity.resolve().ok_or(DomainError::MissingVoterIdentity)?;
        let poll = PollService::new(self.ctx).get_entity_by_slug(slug).await?;
        require_poll_admin_if_private(&poll, voter.user_id())?;
        Ok((poll, voter))
    }
}
