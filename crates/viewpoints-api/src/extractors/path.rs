//! Path parameter extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use viewpoints_core::{PollId, StatementId};

use crate::response::ApiError;

/// `Path` with rejections mapped to `ApiError`
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(inner) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        Ok(ApiPath(inner))
    }
}

/// `/polls/:poll`, where the segment is a slug or, for response listings,
/// the numeric poll id
#[derive(Debug, serde::Deserialize)]
pub struct PollPath {
    pub poll: String,
}

impl PollPath {
    pub fn slug(&self) -> &str {
        &self.poll
    }

    pub fn poll_id(&self) -> Result<PollId, ApiError> {
        self.poll
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid poll id"))
    }
}

/// `/statements/:statement_id`
#[derive(Debug, serde::Deserialize)]
pub struct StatementPath {
    pub statement_id: String,
}

impl StatementPath {
    pub fn statement_id(&self) -> Result<StatementId, ApiError> {
        self.statement_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid statement_id format"))
    }
}

/// `/authors/:user_id`
#[derive(Debug, serde::Deserialize)]
pub struct AuthorPath {
    pub user_id: String,
}
