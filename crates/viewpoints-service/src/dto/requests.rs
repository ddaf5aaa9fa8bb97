//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize`, and `Validate` where they carry
//! free-form input.

use serde::Deserialize;
use validator::Validate;
use viewpoints_core::{PollVisibility, StatementId, Valence};

// ============================================================================
// Poll Requests
// ============================================================================

/// Create poll request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePollRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 500, message = "Core question must be 1-500 characters"))]
    pub core_question: String,

    /// Custom URL slug; derived from the title when absent
    #[validate(length(min = 3, max = 64, message = "Slug must be 3-64 characters"))]
    pub slug: Option<String>,

    /// Identifier used by embedding sites
    #[validate(length(min = 1, max = 64, message = "Embed id must be 1-64 characters"))]
    pub polis_id: Option<String>,

    #[serde(default)]
    pub visibility: PollVisibility,

    /// Seed statements, created in order
    #[serde(default)]
    #[validate(length(max = 50, message = "At most 50 seed statements"))]
    pub statements: Vec<String>,
}

// ============================================================================
// Statement Requests
// ============================================================================

/// Create statement request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStatementRequest {
    #[validate(length(min = 1, max = 140, message = "Statement must be 1-140 characters"))]
    pub text: String,
}

/// Report a statement to the poll admin
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FlagStatementRequest {
    #[validate(length(min = 1, max = 64, message = "Reason must be 1-64 characters"))]
    pub reason: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

// ============================================================================
// Voting Requests
// ============================================================================

/// React to the active statement of a voting session
#[derive(Debug, Clone, Deserialize)]
pub struct ReactRequest {
    pub statement_id: StatementId,
    pub valence: Valence,
}

/// Query string for response listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponsesQuery {
    /// Present (with any value) to list every voter's responses
    pub all: Option<String>,
}

impl ResponsesQuery {
    /// Whether the listing covers every voter instead of only the caller
    pub fn includes_all(&self) -> bool {
        self.all.is_some()
    }
}

// ============================================================================
// Author Requests
// ============================================================================

/// Sync the caller's public author card
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAuthorRequest {
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 2048, message = "Avatar URL must be at most 2048 characters"))]
    pub avatar_url: Option<String>,
}
