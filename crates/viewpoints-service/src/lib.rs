//! # viewpoints-service
//!
//! Application layer: voting sessions, business services and DTOs.

pub mod dto;
pub mod services;
pub mod voting;

pub use services::{
    AuthorService, PollService, ResponseService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, StatementService, VotingService,
};
pub use voting::{ReactOutcome, SessionSnapshot, SessionState, VotingSession, VotingSessionRegistry};
