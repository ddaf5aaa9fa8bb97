//! Authentication extractor
//!
//! Reads the identity provider's bearer token from the Authorization header.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tracing::warn;

use crate::response::ApiError;
use crate::state::AppState;

/// Signed-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Identity-provider user id (`sub`)
    pub user_id: String,
}

impl AuthUser {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

fn verify(state: &AppState, token: &str) -> Result<AuthUser, ApiError> {
    state
        .tokens()
        .verify_user_id(token)
        .map(AuthUser::new)
        .map_err(|e| {
            warn!(error = %e, "Rejected identity token");
            ApiError::InvalidToken
        })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        verify(&AppState::from_ref(state), bearer.token())
    }
}

/// Optional signed-in user
///
/// `None` when no Authorization header is present; a present but invalid
/// token is still rejected.
#[derive(Debug, Clone, Default)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl OptionalAuthUser {
    pub fn user_id(&self) -> Option<&str> {
        self.0.as_ref().map(|user| user.user_id.as_str())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
            Ok(TypedHeader(Authorization(bearer))) => {
                verify(&AppState::from_ref(state), bearer.token()).map(|user| Self(Some(user)))
            }
            Err(_) => Ok(Self(None)),
        }
    }
}
