//! Anonymous session cookie
//!
//! Every visitor gets a random session id cookie on first contact, so
//! signed-out voters can react and be counted.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::{debug, warn};
use uuid::Uuid;
use viewpoints_common::SessionConfig;

use crate::extractors::SessionId;

/// Attach the session id to the request, issuing a cookie when absent
pub async fn session_cookie(
    State(config): State<Arc<SessionConfig>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let existing = jar
        .get(&config.cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty());

    let (session_id, issued) = match existing {
        Some(id) => (id, false),
        None => (Uuid::new_v4().to_string(), true),
    };

    request.extensions_mut().insert(SessionId(session_id.clone()));
    let response = next.run(request).await;

    if !issued {
        return response;
    }

    match build_cookie(&config, &session_id) {
        Some(cookie) => {
            debug!("Issued anonymous session cookie");
            (jar.add(cookie), response).into_response()
        }
        None => {
            warn!(cookie_name = %config.cookie_name, "Could not build session cookie");
            response
        }
    }
}

fn build_cookie(config: &SessionConfig, session_id: &str) -> Option<Cookie<'static>> {
    let max_age = config.cookie_max_age_days.max(1) * 24 * 60 * 60;
    Cookie::parse(format!(
        "{}={session_id}; Path=/; Max-Age={max_age}; HttpOnly; SameSite=Lax",
        config.cookie_name
    ))
    .ok()
}
