//! Poll handlers
//!
//! Listing, creation, lookup by slug or embed id, and results.

use axum::{extract::State, Json};
use viewpoints_service::dto::{
    CreatePollRequest, EmbedPollResponse, PollResponse, PollResultsResponse, PollSummaryResponse,
};
use viewpoints_service::PollService;

use crate::extractors::{ApiPath, AuthUser, OptionalAuthUser, PollPath, ShareLinks, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Embed id path segment
#[derive(Debug, serde::Deserialize)]
pub struct EmbedPath {
    pub polis_id: String,
}

fn with_share_url(mut poll: PollResponse, links: &ShareLinks) -> PollResponse {
    poll.share_url = Some(links.poll_url(&poll.slug));
    poll
}

/// List public polls
///
/// GET /api/polls
pub async fn list_polls(
    State(state): State<AppState>,
    links: ShareLinks,
) -> ApiResult<Json<Vec<PollSummaryResponse>>> {
    let polls = PollService::new(state.service_context())
        .list_public()
        .await?
        .into_iter()
        .map(|mut summary| {
            summary.poll = with_share_url(summary.poll, &links);
            summary
        })
        .collect();
    Ok(Json(polls))
}

/// Create a poll
///
/// POST /api/polls
pub async fn create_poll(
    State(state): State<AppState>,
    auth: AuthUser,
    links: ShareLinks,
    ValidatedJson(request): ValidatedJson<CreatePollRequest>,
) -> ApiResult<Created<Json<PollResponse>>> {
    let poll = PollService::new(state.service_context())
        .create(&auth.user_id, request)
        .await?;
    Ok(Created(Json(with_share_url(poll, &links))))
}

/// Get a poll by slug
///
/// GET /api/polls/{slug}
pub async fn get_poll(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    links: ShareLinks,
    ApiPath(path): ApiPath<PollPath>,
) -> ApiResult<Json<PollResponse>> {
    let poll = PollService::new(state.service_context())
        .get_by_slug(path.slug(), auth.user_id())
        .await?;
    Ok(Json(with_share_url(poll, &links)))
}

/// Per-statement results
///
/// GET /api/polls/{slug}/results
pub async fn get_results(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    links: ShareLinks,
    ApiPath(path): ApiPath<PollPath>,
) -> ApiResult<Json<PollResultsResponse>> {
    let mut results = PollService::new(state.service_context())
        .results(path.slug(), auth.user_id())
        .await?;
    results.poll = with_share_url(results.poll, &links);
    Ok(Json(results))
}

/// Poll and statements for an embedding site
///
/// GET /api/embed/{polis_id}
pub async fn get_embed(
    State(state): State<AppState>,
    links: ShareLinks,
    ApiPath(path): ApiPath<EmbedPath>,
) -> ApiResult<Json<EmbedPollResponse>> {
    let mut embed = PollService::new(state.service_context())
        .get_embed(&path.polis_id)
        .await?;
    embed.poll = with_share_url(embed.poll, &links);
    Ok(Json(embed))
}
