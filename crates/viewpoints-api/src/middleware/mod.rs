//! Middleware stack for the API server
//!
//! Request ids, tracing, timeouts, CORS, rate limiting and the anonymous
//! session cookie.

mod session;

pub use session::session_cookie;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request, StatusCode},
    middleware::from_fn_with_state,
    Router,
};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::GlobalKeyExtractor, GovernorLayer,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};
use viewpoints_common::{AppConfig, CorsConfig};

use crate::state::AppState;

/// Header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Apply the full middleware stack
///
/// Incoming requests pass rate limiting, request id, tracing, timeout, CORS
/// and the session cookie in that order.
pub fn apply_middleware(router: Router<AppState>, config: &AppConfig) -> Router<AppState> {
    let session_config = Arc::new(config.session.clone());

    let router = router
        .layer(from_fn_with_state(session_config, session_cookie))
        .layer(create_cors_layer(&config.cors, config.app.env.is_production()))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            REQUEST_TIMEOUT,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(header::HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            header::HeaderName::from_static(REQUEST_ID_HEADER),
            MakeRequestUuid,
        ));

    // Global (not per-IP) limiter
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(config.rate_limit.requests_per_second.max(1).into())
        .burst_size(config.rate_limit.burst.max(1))
        .key_extractor(GlobalKeyExtractor)
        .finish();

    match governor_conf {
        Some(conf) => router.layer(GovernorLayer {
            config: Arc::new(conf),
        }),
        None => {
            warn!("Rate limiter configuration rejected; serving without rate limiting");
            router
        }
    }
}

/// CORS layer from configuration
///
/// Without configured origins, development allows any origin and
/// production blocks cross-origin browser requests.
fn create_cors_layer(config: &CorsConfig, is_production: bool) -> CorsLayer {
    let base_layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([header::HeaderName::from_static(REQUEST_ID_HEADER)]);

    if !config.allowed_origins.is_empty() {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| {
                origin.parse::<HeaderValue>().ok().or_else(|| {
                    warn!(%origin, "Invalid CORS origin");
                    None
                })
            })
            .collect();

        info!(count = origins.len(), "CORS: allowing configured origins");
        // Credentialed requests carry the session cookie
        base_layer
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
    } else if is_production {
        warn!("CORS: no allowed origins configured in production; cross-origin requests are blocked");
        base_layer.allow_origin(AllowOrigin::list(Vec::<HeaderValue>::new()))
    } else {
        warn!("CORS: allowing any origin (development mode)");
        base_layer.allow_origin(Any)
    }
}
