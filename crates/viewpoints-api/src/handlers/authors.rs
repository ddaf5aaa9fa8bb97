//! Author card handlers

use axum::{extract::State, Json};
use viewpoints_service::dto::{AuthorResponse, UpdateAuthorRequest};
use viewpoints_service::AuthorService;

use crate::extractors::{ApiPath, AuthUser, AuthorPath, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Sync the caller's name and avatar
///
/// PUT /api/authors/@me
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateAuthorRequest>,
) -> ApiResult<Json<AuthorResponse>> {
    let author = AuthorService::new(state.service_context())
        .upsert_profile(&auth.user_id, request)
        .await?;
    Ok(Json(author))
}

/// Public author card
///
/// GET /api/authors/{user_id}
pub async fn get_author(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<AuthorPath>,
) -> ApiResult<Json<AuthorResponse>> {
    let author = AuthorService::new(state.service_context())
        .get(&path.user_id)
        .await?;
    Ok(Json(author))
}
