//! Response listing handler

use axum::{
    extract::{Query, State},
    Json,
};
use viewpoints_service::dto::{ResponseResponse, ResponsesQuery};
use viewpoints_service::ResponseService;

use crate::extractors::{ApiPath, PollPath, Voter};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Responses to a poll: the caller's, or everyone's with `?all`
///
/// GET /api/polls/{id}/responses
pub async fn list_responses(
    State(state): State<AppState>,
    voter: Voter,
    ApiPath(path): ApiPath<PollPath>,
    query: Result<Query<ResponsesQuery>, axum::extract::rejection::QueryRejection>,
) -> ApiResult<Json<Vec<ResponseResponse>>> {
    let Query(query) = query.map_err(|e| ApiError::invalid_query(e.body_text()))?;

    let responses = ResponseService::new(state.service_context())
        .list(path.poll_id()?, &voter, query.includes_all())
        .await?;
    Ok(Json(responses))
}
