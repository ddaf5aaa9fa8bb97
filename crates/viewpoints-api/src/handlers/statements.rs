//! Statement handlers

use axum::{extract::State, Json};
use viewpoints_service::dto::{
    CreateStatementRequest, DeletedFlagsResponse, FlagResponse, FlagStatementRequest,
    StatementResponse,
};
use viewpoints_service::StatementService;

use crate::extractors::{
    ApiPath, OptionalAuthUser, PollPath, StatementPath, ValidatedJson, Voter,
};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// List a poll's statements
///
/// GET /api/polls/{slug}/statements
pub async fn list_statements(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    ApiPath(path): ApiPath<PollPath>,
) -> ApiResult<Json<Vec<StatementResponse>>> {
    let statements = StatementService::new(state.service_context())
        .list(path.slug(), auth.user_id())
        .await?;
    Ok(Json(statements))
}

/// Submit a statement
///
/// POST /api/polls/{slug}/statements
pub async fn create_statement(
    State(state): State<AppState>,
    voter: Voter,
    ApiPath(path): ApiPath<PollPath>,
    ValidatedJson(request): ValidatedJson<CreateStatementRequest>,
) -> ApiResult<Created<Json<StatementResponse>>> {
    let statement = StatementService::new(state.service_context())
        .create(path.slug(), &voter, request)
        .await?;
    Ok(Created(Json(statement)))
}

/// Delete a statement (poll admin)
///
/// DELETE /api/statements/{statement_id}
pub async fn delete_statement(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    ApiPath(path): ApiPath<StatementPath>,
) -> ApiResult<NoContent> {
    StatementService::new(state.service_context())
        .delete(path.statement_id()?, auth.user_id())
        .await?;
    Ok(NoContent)
}

/// Flag a statement
///
/// POST /api/statements/{statement_id}/flags
pub async fn flag_statement(
    State(state): State<AppState>,
    voter: Voter,
    ApiPath(path): ApiPath<StatementPath>,
    ValidatedJson(request): ValidatedJson<FlagStatementRequest>,
) -> ApiResult<Created<Json<FlagResponse>>> {
    let flag = StatementService::new(state.service_context())
        .flag(path.statement_id()?, &voter, request)
        .await?;
    Ok(Created(Json(flag)))
}

/// List a statement's flags (poll admin)
///
/// GET /api/statements/{statement_id}/flags
pub async fn list_flags(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    ApiPath(path): ApiPath<StatementPath>,
) -> ApiResult<Json<Vec<FlagResponse>>> {
    let flags = StatementService::new(state.service_context())
        .list_flags(path.statement_id()?, auth.user_id())
        .await?;
    Ok(Json(flags))
}

/// Clear a statement's flags (poll admin)
///
/// DELETE /api/statements/{statement_id}/flags
pub async fn delete_flags(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    ApiPath(path): ApiPath<StatementPath>,
) -> ApiResult<Json<DeletedFlagsResponse>> {
    let deleted = StatementService::new(state.service_context())
        .delete_flags(path.statement_id()?, auth.user_id())
        .await?;
    Ok(Json(deleted))
}
