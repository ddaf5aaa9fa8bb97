//! Route definitions
//!
//! API routes are mounted under /api; health probes sit at the root.

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{authors, health, polls, responses, statements, voting};
use crate::state::AppState;

/// Main API router (health routes are separate so they skip rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api", api_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(poll_routes())
        .merge(voting_routes())
        .merge(statement_routes())
        .merge(author_routes())
}

/// Poll routes
///
/// The `:poll` segment is a slug everywhere except `/responses`, which
/// takes the numeric poll id.
fn poll_routes() -> Router<AppState> {
    Router::new()
        .route("/polls", get(polls::list_polls).post(polls::create_poll))
        .route("/polls/:poll", get(polls::get_poll))
        .route("/polls/:poll/results", get(polls::get_results))
        .route(
            "/polls/:poll/statements",
            get(statements::list_statements).post(statements::create_statement),
        )
        .route("/polls/:poll/responses", get(responses::list_responses))
        .route("/embed/:polis_id", get(polls::get_embed))
}

/// Voting session routes
fn voting_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/polls/:poll/session",
            get(voting::get_session)
                .post(voting::start_session)
                .delete(voting::end_session),
        )
        .route("/polls/:poll/session/react", post(voting::react))
        .route("/polls/:poll/session/failures", get(voting::take_failures))
        .route("/polls/:poll/session/resurface", post(voting::resurface_failures))
}

/// Statement moderation routes
fn statement_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/statements/:statement_id",
            axum::routing::delete(statements::delete_statement),
        )
        .route(
            "/statements/:statement_id/flags",
            get(statements::list_flags)
                .post(statements::flag_statement)
                .delete(statements::delete_flags),
        )
}

/// Author routes
fn author_routes() -> Router<AppState> {
    Router::new()
        .route("/authors/@me", put(authors::update_me))
        .route("/authors/:user_id", get(authors::get_author))
}
