//! Author service
//!
//! Keeps the public author card (name, avatar) of signed-in users in sync
//! with what the identity provider reports.

use tracing::{info, instrument};
use viewpoints_core::Author;

use crate::dto::{AuthorResponse, UpdateAuthorRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Author service
pub struct AuthorService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthorService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get a user's author card
    #[instrument(skip(self))]
    pub async fn get(&self, user_id: &str) -> ServiceResult<AuthorResponse> {
        let author = self
            .ctx
            .author_repo()
            .find(user_id)
            .await?
            .unwrap_or_else(|| Author {
                user_id: user_id.to_string(),
                name: None,
                avatar_url: None,
            });
        Ok(AuthorResponse::from(&author))
    }

    /// Create or replace the caller's author card
    #[instrument(skip(self, request))]
    pub async fn upsert_profile(
        &self,
        user_id: &str,
        request: UpdateAuthorRequest,
    ) -> ServiceResult<AuthorResponse> {
        let author = Author {
            user_id: user_id.to_string(),
            name: clean(request.name),
            avatar_url: clean(request.avatar_url),
        };
        self.ctx.author_repo().upsert(&author).await?;

        info!(user_id = %user_id, "Author profile updated");
        Ok(AuthorResponse::from(&author))
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
