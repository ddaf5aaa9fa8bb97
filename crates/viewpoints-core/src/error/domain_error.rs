//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{PollId, StatementId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Poll not found: {0}")]
    PollNotFound(PollId),

    #[error("Poll not found: {0}")]
    PollSlugNotFound(String),

    #[error("Embedded poll not found: {0}")]
    EmbedNotFound(String),

    #[error("Statement not found: {0}")]
    StatementNotFound(StatementId),

    #[error("No voting session for this poll")]
    VotingSessionNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Statement must not be empty")]
    EmptyStatement,

    #[error("Statement too long: max {max} characters")]
    StatementTooLong { max: usize },

    #[error("Invalid slug: {0}")]
    InvalidSlug(String),

    // =========================================================================
    // Identity / Authorization Errors
    // =========================================================================
    #[error("No voter identity available (neither user nor session)")]
    MissingVoterIdentity,

    #[error("Not the poll admin")]
    NotPollAdmin,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Slug already in use: {0}")]
    SlugAlreadyExists(String),

    #[error("Embed id already in use: {0}")]
    PolisIdAlreadyExists(String),

    #[error("Statement {0} is not the active statement")]
    NotActiveStatement(StatementId),

    #[error("Voting queue is exhausted")]
    QueueExhausted,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::PollNotFound(_) | Self::PollSlugNotFound(_) => "UNKNOWN_POLL",
            Self::EmbedNotFound(_) => "UNKNOWN_EMBED",
            Self::StatementNotFound(_) => "UNKNOWN_STATEMENT",
            Self::VotingSessionNotFound => "UNKNOWN_VOTING_SESSION",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyStatement => "EMPTY_STATEMENT",
            Self::StatementTooLong { .. } => "STATEMENT_TOO_LONG",
            Self::InvalidSlug(_) => "INVALID_SLUG",

            // Identity / Authorization
            Self::MissingVoterIdentity => "MISSING_VOTER_IDENTITY",
            Self::NotPollAdmin => "NOT_POLL_ADMIN",

            // Conflict
            Self::SlugAlreadyExists(_) => "SLUG_ALREADY_EXISTS",
            Self::PolisIdAlreadyExists(_) => "POLIS_ID_ALREADY_EXISTS",
            Self::NotActiveStatement(_) => "NOT_ACTIVE_STATEMENT",
            Self::QueueExhausted => "QUEUE_EXHAUSTED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PollNotFound(_)
                | Self::PollSlugNotFound(_)
                | Self::EmbedNotFound(_)
                | Self::StatementNotFound(_)
                | Self::VotingSessionNotFound
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::EmptyStatement
                | Self::StatementTooLong { .. }
                | Self::InvalidSlug(_)
        )
    }

    /// Check if the caller could not be identified
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::MissingVoterIdentity)
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotPollAdmin)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::SlugAlreadyExists(_)
                | Self::PolisIdAlreadyExists(_)
                | Self::NotActiveStatement(_)
                | Self::QueueExhausted
        )
    }

    /// HTTP-style status code for this error
    pub fn status_code(&self) -> u16 {
        if self.is_not_found() {
            404
        } else if self.is_authentication() {
            401
        } else if self.is_authorization() {
            403
        } else if self.is_validation() {
            400
        } else if self.is_conflict() {
            409
        } else {
            500
        }
    }
}
