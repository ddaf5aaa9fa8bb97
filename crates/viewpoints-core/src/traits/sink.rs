//! Persistence sink for reactions

use async_trait::async_trait;

use crate::entities::{NewResponse, Response};
use crate::traits::RepoResult;

/// Durable store a voting session writes reactions to
///
/// One call is one write attempt; implementations must not retry or
/// deduplicate on their own.
#[async_trait]
pub trait ResponseSink: Send + Sync {
    async fn record(&self, response: &NewResponse) -> RepoResult<Response>;
}
