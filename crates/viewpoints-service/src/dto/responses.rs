//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output. Anonymous session
//! ids never leave the server; responses only expose user ids.

use chrono::{DateTime, Utc};
use serde::Serialize;
use viewpoints_core::{PollVisibility, Valence};

// ============================================================================
// Common Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

// ============================================================================
// Poll Responses
// ============================================================================

/// Poll metadata
#[derive(Debug, Clone, Serialize)]
pub struct PollResponse {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub core_question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polis_id: Option<String>,
    pub visibility: PollVisibility,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    /// Absolute link to the poll, filled in by the HTTP layer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
}

/// Public author card
#[derive(Debug, Clone, Serialize)]
pub struct AuthorResponse {
    pub user_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Poll as listed on the index
#[derive(Debug, Clone, Serialize)]
pub struct PollSummaryResponse {
    #[serde(flatten)]
    pub poll: PollResponse,
    pub statement_count: i64,
    pub respondent_count: i64,
    pub author: Option<AuthorResponse>,
}

/// Poll with its statements, for embedding sites
#[derive(Debug, Clone, Serialize)]
pub struct EmbedPollResponse {
    pub poll: PollResponse,
    pub statements: Vec<StatementResponse>,
}

/// Aggregated reactions for one statement
#[derive(Debug, Clone, Serialize)]
pub struct StatementResultResponse {
    pub statement_id: i64,
    pub text: String,
    pub agree: i64,
    pub disagree: i64,
    pub skip: i64,
    pub total: i64,
    /// agree / (agree + disagree); null when nobody took a side
    pub agreement: Option<f64>,
}

/// Aggregated results of a poll
#[derive(Debug, Clone, Serialize)]
pub struct PollResultsResponse {
    pub poll: PollResponse,
    pub respondent_count: i64,
    pub statements: Vec<StatementResultResponse>,
}

// ============================================================================
// Statement Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementResponse {
    pub id: i64,
    pub poll_id: i64,
    pub text: String,
    /// Set when a signed-in user wrote the statement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlagResponse {
    pub id: i64,
    pub statement_id: i64,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletedFlagsResponse {
    pub statement_id: i64,
    pub deleted: u64,
}

// ============================================================================
// Response (reaction) Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ResponseResponse {
    pub id: i64,
    pub statement_id: i64,
    pub valence: Valence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Voting Session Responses
// ============================================================================

/// Current state of the caller's voting session
#[derive(Debug, Clone, Serialize)]
pub struct VotingSessionResponse {
    pub poll_id: i64,
    pub active: Option<StatementResponse>,
    pub remaining: usize,
    /// Nothing left to vote on; invite the voter to add a statement
    pub exhausted: bool,
}

/// Result of reacting to the active statement
#[derive(Debug, Clone, Serialize)]
pub struct ReactResponse {
    pub next: Option<StatementResponse>,
    pub remaining: usize,
    pub exhausted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WriteFailureResponse {
    pub statement: StatementResponse,
    pub valence: Valence,
    pub error: String,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION"),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub voting_sessions: usize,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, voting_sessions: usize) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
                voting_sessions,
            },
        }
    }
}
