//! Response service

use tracing::instrument;
use viewpoints_core::{DomainError, IdentityResolver, PollId};

use crate::dto::ResponseResponse;

use super::authz::require_poll_admin_if_private;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Response service
pub struct ResponseService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ResponseService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Responses to a poll
    ///
    /// Scoped to the caller unless `all` is set. The caller is the user when
    /// signed in and the anonymous session otherwise.
    #[instrument(skip(self, identity))]
    pub async fn list(
        &self,
        poll_id: PollId,
        identity: &dyn IdentityResolver,
        all: bool,
    ) -> ServiceResult<Vec<ResponseResponse>> {
        let voter = identity.resolve();

        let poll = self
            .ctx
            .poll_repo()
            .find_by_id(poll_id)
            .await?
            .ok_or_else(|| ServiceError::from(DomainError::PollNotFound(poll_id)))?;
        require_poll_admin_if_private(&poll, voter.as_ref().and_then(|v| v.user_id()))?;

        let scope = if all {
            None
        } else {
            Some(voter.as_ref().ok_or(DomainError::MissingVoterIdentity)?)
        };

        let responses = self.ctx.response_repo().find_by_poll(poll.id, scope).await?;
        Ok(responses.into_iter().map(ResponseResponse::from).collect())
    }
}
