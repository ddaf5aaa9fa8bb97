//! Voting session handlers
//!
//! One live session per voter and poll: start it, react to the statement on
//! top, and inspect or re-queue failed writes.

use axum::{extract::State, Json};
use viewpoints_service::dto::{
    ReactRequest, ReactResponse, VotingSessionResponse, WriteFailureResponse,
};
use viewpoints_service::VotingService;

use crate::extractors::{ApiPath, PollPath, Voter};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

/// Start (or restart) a voting session
///
/// POST /api/polls/{slug}/session
pub async fn start_session(
    State(state): State<AppState>,
    voter: Voter,
    ApiPath(path): ApiPath<PollPath>,
) -> ApiResult<Created<Json<VotingSessionResponse>>> {
    let session = VotingService::new(state.service_context())
        .start(path.slug(), &voter)
        .await?;
    Ok(Created(Json(session)))
}

/// Current session state
///
/// GET /api/polls/{slug}/session
pub async fn get_session(
    State(state): State<AppState>,
    voter: Voter,
    ApiPath(path): ApiPath<PollPath>,
) -> ApiResult<Json<VotingSessionResponse>> {
    let session = VotingService::new(state.service_context())
        .current(path.slug(), &voter)
        .await?;
    Ok(Json(session))
}

/// React to the statement on top
///
/// POST /api/polls/{slug}/session/react
pub async fn react(
    State(state): State<AppState>,
    voter: Voter,
    ApiPath(path): ApiPath<PollPath>,
    request: Result<Json<ReactRequest>, axum::extract::rejection::JsonRejection>,
) -> ApiResult<Json<ReactResponse>> {
    let Json(request) = request.map_err(|e| ApiError::invalid_body(e.body_text()))?;

    let outcome = VotingService::new(state.service_context())
        .react(path.slug(), &voter, request)
        .await?;
    Ok(Json(outcome))
}

/// Drain failed writes
///
/// GET /api/polls/{slug}/session/failures
pub async fn take_failures(
    State(state): State<AppState>,
    voter: Voter,
    ApiPath(path): ApiPath<PollPath>,
) -> ApiResult<Json<Vec<WriteFailureResponse>>> {
    let failures = VotingService::new(state.service_context())
        .failures(path.slug(), &voter)
        .await?;
    Ok(Json(failures))
}

/// Re-queue statements whose writes failed
///
/// POST /api/polls/{slug}/session/resurface
pub async fn resurface_failures(
    State(state): State<AppState>,
    voter: Voter,
    ApiPath(path): ApiPath<PollPath>,
) -> ApiResult<Json<VotingSessionResponse>> {
    let session = VotingService::new(state.service_context())
        .resurface(path.slug(), &voter)
        .await?;
    Ok(Json(session))
}

/// End the session
///
/// DELETE /api/polls/{slug}/session
pub async fn end_session(
    State(state): State<AppState>,
    voter: Voter,
    ApiPath(path): ApiPath<PollPath>,
) -> ApiResult<NoContent> {
    VotingService::new(state.service_context())
        .end(path.slug(), &voter)
        .await?;
    Ok(NoContent)
}
