//! Voter identity extractor
//!
//! A voter is the signed-in user when a valid bearer token is present and
//! the anonymous session cookie otherwise.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::CookieJar;
use viewpoints_core::{IdentityResolver, ResolvedIdentity, VoterIdentity};

use super::auth::OptionalAuthUser;
use crate::response::ApiError;
use crate::state::AppState;

/// Anonymous session id placed in request extensions by the session middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

/// Identities found on the request
#[derive(Debug, Clone)]
pub struct Voter {
    identity: ResolvedIdentity,
}

impl Voter {
    pub fn new(user_id: Option<String>, session_id: Option<String>) -> Self {
        Self {
            identity: ResolvedIdentity::new(user_id, session_id),
        }
    }

    /// Signed-in user id, if any
    pub fn user_id(&self) -> Option<&str> {
        self.identity.user_id.as_deref()
    }

    pub fn identity(&self) -> &ResolvedIdentity {
        &self.identity
    }
}

impl IdentityResolver for Voter {
    fn resolve(&self) -> Option<VoterIdentity> {
        self.identity.resolve()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Voter
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = OptionalAuthUser::from_request_parts(parts, state).await?;

        // Freshly issued ids only exist in the extensions until the response
        // sets the cookie
        let session_id = match parts.extensions.get::<SessionId>() {
            Some(SessionId(id)) => Some(id.clone()),
            None => {
                let app_state = AppState::from_ref(state);
                let jar = CookieJar::from_headers(&parts.headers);
                jar.get(&app_state.config().session.cookie_name)
                    .map(|cookie| cookie.value().to_string())
            }
        };

        Ok(Self::new(user.0.map(|u| u.user_id), session_id))
    }
}
