//! Poll service
//!
//! Handles poll creation, listings, embed lookups and results.

use std::collections::HashMap;

use tracing::{debug, info, instrument, warn};
use viewpoints_core::{DomainError, NewPoll, Poll};

use crate::dto::{
    statement_result, CreatePollRequest, EmbedPollResponse, PollResponse, PollResultsResponse,
    PollSummaryResponse, StatementResponse,
};

use super::authz::require_poll_admin_if_private;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::slug;

/// Attempts at a free generated slug before giving up
const SLUG_ATTEMPTS: usize = 5;

/// Poll service
pub struct PollService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PollService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Public polls, newest first, with their counts and author card
    #[instrument(skip(self))]
    pub async fn list_public(&self) -> ServiceResult<Vec<PollSummaryResponse>> {
        let summaries = self.ctx.poll_repo().list_public().await?;
        Ok(summaries.into_iter().map(PollSummaryResponse::from).collect())
    }

    /// Get poll entity by slug
    #[instrument(skip(self))]
    pub async fn get_entity_by_slug(&self, slug: &str) -> ServiceResult<Poll> {
        self.ctx
            .poll_repo()
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::PollSlugNotFound(slug.to_string()).into())
    }

    /// Get poll by slug
    ///
    /// Hidden polls are reachable by slug; private ones only by their admin.
    #[instrument(skip(self))]
    pub async fn get_by_slug(&self, slug: &str, user_id: Option<&str>) -> ServiceResult<PollResponse> {
        let poll = self.get_entity_by_slug(slug).await?;
        require_poll_admin_if_private(&poll, user_id)?;
        Ok(PollResponse::from(poll))
    }

    /// Get a poll and its statements by embed id
    #[instrument(skip(self))]
    pub async fn get_embed(&self, polis_id: &str) -> ServiceResult<EmbedPollResponse> {
        let poll = self
            .ctx
            .poll_repo()
            .find_by_polis_id(polis_id)
            .await?
            .ok_or_else(|| DomainError::EmbedNotFound(polis_id.to_string()))?;

        let statements = self.ctx.statement_repo().find_by_poll(poll.id).await?;

        Ok(EmbedPollResponse {
            poll: PollResponse::from(poll),
            statements: statements.into_iter().map(StatementResponse::from).collect(),
        })
    }

    /// Create a poll owned by `user_id`, with optional seed statements
    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        user_id: &str,
        request: CreatePollRequest,
    ) -> ServiceResult<PollResponse> {
        // Reject bad seed statements before anything is written
        let seed_texts = request
            .statements
            .iter()
            .map(|text| viewpoints_core::Statement::normalize_text(text))
            .collect::<Result<Vec<_>, _>>()?;

        let mut new_poll = NewPoll {
            user_id: user_id.to_string(),
            slug: String::new(),
            title: request.title.trim().to_string(),
            core_question: request.core_question.trim().to_string(),
            polis_id: request
                .polis_id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
            visibility: request.visibility,
        };

        let poll = match request.slug {
            Some(custom) => {
                new_poll.slug = slug::normalize_custom(&custom)?;
                self.ctx.poll_repo().create(&new_poll, &seed_texts).await?
            }
            None => self.create_with_generated_slug(new_poll, &seed_texts).await?,
        };

        info!(
            poll_id = %poll.id,
            slug = %poll.slug,
            statements = seed_texts.len(),
            "Poll created"
        );

        Ok(PollResponse::from(poll))
    }

    async fn create_with_generated_slug(
        &self,
        mut new_poll: NewPoll,
        seed_texts: &[String],
    ) -> ServiceResult<Poll> {
        let base = slug::slugify(&new_poll.title);

        for attempt in 1..=SLUG_ATTEMPTS {
            new_poll.slug = slug::with_random_suffix(&base);
            if self.ctx.poll_repo().slug_exists(&new_poll.slug).await? {
                debug!(slug = %new_poll.slug, attempt, "Generated slug taken");
                continue;
            }

            match self.ctx.poll_repo().create(&new_poll, seed_texts).await {
                Ok(poll) => return Ok(poll),
                // Lost a race for the slug
                Err(DomainError::SlugAlreadyExists(slug)) => {
                    debug!(%slug, attempt, "Generated slug taken on insert");
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(base = %base, "Could not find a free slug");
        Err(ServiceError::conflict(format!(
            "Could not generate a free slug for '{base}'"
        )))
    }

    /// Per-statement reaction counts
    #[instrument(skip(self))]
    pub async fn results(
        &self,
        slug: &str,
        user_id: Option<&str>,
    ) -> ServiceResult<PollResultsResponse> {
        let poll = self.get_entity_by_slug(slug).await?;
        require_poll_admin_if_private(&poll, user_id)?;

        let statements = self.ctx.statement_repo().find_by_poll(poll.id).await?;
        let tallies = self.ctx.response_repo().tally_by_poll(poll.id).await?;
        let respondent_count = self.ctx.response_repo().count_respondents(poll.id).await?;

        let mut texts: HashMap<_, _> = statements.into_iter().map(|s| (s.id, s.text)).collect();
        let statements = tallies
            .iter()
            .filter_map(|tally| {
                texts
                    .remove(&tally.statement_id)
                    .map(|text| statement_result(tally, text))
            })
            .collect();

        Ok(PollResultsResponse {
            poll: PollResponse::from(poll),
            respondent_count,
            statements,
        })
    }
}
