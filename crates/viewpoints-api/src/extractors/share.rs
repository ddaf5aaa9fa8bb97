//! Absolute share links
//!
//! Share links use `PUBLIC_BASE_URL` when configured. Otherwise the base is
//! rebuilt from the request: `Host` picks the scheme (plain http on the
//! local network), then `x-forwarded-host` / `x-forwarded-proto` override.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};

use crate::state::AppState;

const FALLBACK_HOST: &str = "localhost:3000";

/// Builds absolute URLs for the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinks {
    base: String,
}

impl ShareLinks {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Public page of a poll
    pub fn poll_url(&self, slug: &str) -> String {
        format!("{}/polls/{slug}", self.base)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ShareLinks
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let base = match &app_state.config().app.public_base_url {
            Some(url) => url.clone(),
            None => base_url_from_headers(&parts.headers),
        };
        Ok(Self::new(base))
    }
}

/// Derive `scheme://host` from request headers
pub fn base_url_from_headers(headers: &HeaderMap) -> String {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let mut host = header_str(header::HOST.as_str()).unwrap_or(FALLBACK_HOST);
    let mut scheme = if is_local_network(host) { "http" } else { "https" };

    if let Some(forwarded) = header_str("x-forwarded-host") {
        host = forwarded;
    }
    if let Some(proto) = header_str("x-forwarded-proto") {
        scheme = proto;
    }

    format!("{scheme}://{host}")
}

/// Hosts served over plain http
pub fn is_local_network(host: &str) -> bool {
    host.starts_with("localhost")
        || host.starts_with("127.0.0.1")
        || host.starts_with("192.168.")
        || host.starts_with("10.0.")
        || host.ends_with(".local")
}
