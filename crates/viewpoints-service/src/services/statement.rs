//! Statement service
//!
//! Handles statement listing, submission, deletion and moderation flags.

use tracing::{debug, info, instrument};
use viewpoints_core::{
    DomainError, IdentityResolver, NewFlag, NewStatement, Poll, Statement, StatementId,
};

use crate::dto::{
    CreateStatementRequest, DeletedFlagsResponse, FlagResponse, FlagStatementRequest,
    StatementResponse,
};

use super::authz::{require_poll_admin, require_poll_admin_if_private};
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::poll::PollService;

/// Statement service
pub struct StatementService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StatementService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Statements of a poll, oldest first
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        slug: &str,
        user_id: Option<&str>,
    ) -> ServiceResult<Vec<StatementResponse>> {
        let poll = PollService::new(self.ctx).get_entity_by_slug(slug).await?;
        require_poll_admin_if_private(&poll, user_id)?;

        let statements = self.ctx.statement_repo().find_by_poll(poll.id).await?;
        Ok(statements.into_iter().map(StatementResponse::from).collect())
    }

    /// Submit a statement to a poll
    ///
    /// The new statement goes on top of the author's live voting session,
    /// if they have one for this poll.
    #[instrument(skip(self, identity, request))]
    pub async fn create(
        &self,
        slug: &str,
        identity: &dyn IdentityResolver,
        request: CreateStatementRequest,
    ) -> ServiceResult<StatementResponse> {
        let author = identity.resolve().ok_or(DomainError::MissingVoterIdentity)?;

        let poll = PollService::new(self.ctx).get_entity_by_slug(slug).await?;
        require_poll_admin_if_private(&poll, author.user_id())?;

        let new = NewStatement::new(poll.id, Some(author.clone()), &request.text)?;
        let statement = self.ctx.statement_repo().create(&new).await?;

        info!(
            statement_id = %statement.id,
            poll_id = %poll.id,
            author = %author,
            "Statement created"
        );

        if self
            .ctx
            .sessions()
            .append_statement(poll.id, &author, statement.clone())
        {
            debug!(statement_id = %statement.id, "Statement pushed onto author's voting session");
        }

        Ok(StatementResponse::from(statement))
    }

    /// Delete a statement and its responses (poll admin only)
    #[instrument(skip(self))]
    pub async fn delete(&self, statement_id: StatementId, user_id: Option<&str>) -> ServiceResult<()> {
        let (statement, poll) = self.statement_and_poll(statement_id).await?;
        require_poll_admin(&poll, user_id)?;

        self.ctx.statement_repo().delete(statement.id).await?;
        self.ctx.sessions().remove_statement(poll.id, statement.id);

        info!(statement_id = %statement.id, poll_id = %poll.id, "Statement deleted");
        Ok(())
    }

    /// Report a statement
    #[instrument(skip(self, identity, request))]
    pub async fn flag(
        &self,
        statement_id: StatementId,
        identity: &dyn IdentityResolver,
        request: FlagStatementRequest,
    ) -> ServiceResult<FlagResponse> {
        let reporter = identity.resolve().ok_or(DomainError::MissingVoterIdentity)?;

        let (statement, poll) = self.statement_and_poll(statement_id).await?;
        require_poll_admin_if_private(&poll, reporter.user_id())?;

        let new = NewFlag::new(statement.id, reporter, &request.reason, request.description)?;
        let flag = self.ctx.flag_repo().create(&new).await?;

        info!(statement_id = %statement.id, flag_id = %flag.id, reason = %flag.reason, "Statement flagged");
        Ok(FlagResponse::from(flag))
    }

    /// Flags raised against a statement (poll admin only)
    #[instrument(skip(self))]
    pub async fn list_flags(
        &self,
        statement_id: StatementId,
        user_id: Option<&str>,
    ) -> ServiceResult<Vec<FlagResponse>> {
        let (statement, poll) = self.statement_and_poll(statement_id).await?;
        require_poll_admin(&poll, user_id)?;

        let flags = self.ctx.flag_repo().find_by_statement(statement.id).await?;
        Ok(flags.into_iter().map(FlagResponse::from).collect())
    }

    /// Dismiss every flag on a statement (poll admin only)
    #[instrument(skip(self))]
    pub async fn delete_flags(
        &self,
        statement_id: StatementId,
        user_id: Option<&str>,
    ) -> ServiceResult<DeletedFlagsResponse> {
        let (statement, poll) = self.statement_and_poll(statement_id).await?;
        require_poll_admin(&poll, user_id)?;

        let deleted = self.ctx.flag_repo().delete_by_statement(statement.id).await?;

        info!(statement_id = %statement.id, deleted, "Statement flags cleared");
        Ok(DeletedFlagsResponse {
            statement_id: statement.id.into_inner(),
            deleted,
        })
    }

    async fn statement_and_poll(&self, statement_id: StatementId) -> ServiceResult<(Statement, Poll)> {
        let statement = self
            .ctx
            .statement_repo()
            .find_by_id(statement_id)
            .await?
            .ok_or(DomainError::StatementNotFound(statement_id))?;

        let poll = self
            .ctx
            .poll_repo()
            .find_by_id(statement.poll_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Poll", statement.poll_id.to_string()))?;

        Ok((statement, poll))
    }
}
