//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{
    CreatePollRequest, CreateStatementRequest, FlagStatementRequest, ReactRequest,
    ResponsesQuery, UpdateAuthorRequest,
};

// Re-export commonly used response types
pub use responses::{
    ApiResponse, AuthorResponse, DeletedFlagsResponse, EmbedPollResponse, FlagResponse,
    HealthChecks, HealthResponse, PollResponse, PollResultsResponse, PollSummaryResponse,
    ReactResponse, ReadinessResponse, ResponseResponse, StatementResponse,
    StatementResultResponse, VotingSessionResponse, WriteFailureResponse,
};

pub use mappers::{statement_result, voting_session_response};
