//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{
    Author, NewFlag, NewPoll, NewStatement, Poll, PollSummary, Response, Statement, StatementFlag,
    StatementTally,
};
use crate::error::DomainError;
use crate::value_objects::{PollId, StatementId, VoterIdentity};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Poll Repository
// ============================================================================

#[async_trait]
pub trait PollRepository: Send + Sync {
    /// Find poll by ID
    async fn find_by_id(&self, id: PollId) -> RepoResult<Option<Poll>>;

    /// Find poll by its URL slug
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Poll>>;

    /// Find poll by its embed identifier
    async fn find_by_polis_id(&self, polis_id: &str) -> RepoResult<Option<Poll>>;

    /// List public polls, newest first, with statement and respondent counts
    async fn list_public(&self) -> RepoResult<Vec<PollSummary>>;

    /// Check if a slug is already taken
    async fn slug_exists(&self, slug: &str) -> RepoResult<bool>;

    /// Insert a poll and its seed statements in one transaction
    ///
    /// Seed statements are authored by the poll owner. A taken slug yields
    /// `SlugAlreadyExists`, a taken embed id `PolisIdAlreadyExists`; nothing
    /// is stored on error.
    async fn create(&self, poll: &NewPoll, seed_statements: &[String]) -> RepoResult<Poll>;
}

// ============================================================================
// Statement Repository
// ============================================================================

#[async_trait]
pub trait StatementRepository: Send + Sync {
    /// Find statement by ID
    async fn find_by_id(&self, id: StatementId) -> RepoResult<Option<Statement>>;

    /// List statements of a poll, oldest first
    async fn find_by_poll(&self, poll_id: PollId) -> RepoResult<Vec<Statement>>;

    /// List statements of a poll the voter has not reacted to, oldest first
    async fn find_unanswered(
        &self,
        poll_id: PollId,
        voter: &VoterIdentity,
    ) -> RepoResult<Vec<Statement>>;

    /// Insert a statement and return the stored row
    async fn create(&self, statement: &NewStatement) -> RepoResult<Statement>;

    /// Delete a statement (responses and flags cascade)
    async fn delete(&self, id: StatementId) -> RepoResult<()>;
}

// ============================================================================
// Response Repository
// ============================================================================

#[async_trait]
pub trait ResponseRepository: Send + Sync {
    /// List responses to a poll's statements, optionally restricted to one voter
    async fn find_by_poll(
        &self,
        poll_id: PollId,
        voter: Option<&VoterIdentity>,
    ) -> RepoResult<Vec<Response>>;

    /// Count reactions per statement and valence for a poll
    async fn tally_by_poll(&self, poll_id: PollId) -> RepoResult<Vec<StatementTally>>;

    /// Count distinct voters who reacted to any statement of the poll
    async fn count_respondents(&self, poll_id: PollId) -> RepoResult<i64>;
}

// ============================================================================
// Author Repository
// ============================================================================

#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Find author profile by user id
    async fn find(&self, user_id: &str) -> RepoResult<Option<Author>>;

    /// Find author profiles for several users at once
    async fn find_many(&self, user_ids: &[String]) -> RepoResult<Vec<Author>>;

    /// Insert or update an author profile
    async fn upsert(&self, author: &Author) -> RepoResult<()>;
}

// ============================================================================
// Flag Repository
// ============================================================================

#[async_trait]
pub trait FlagRepository: Send + Sync {
    /// Record a report against a statement
    async fn create(&self, flag: &NewFlag) -> RepoResult<StatementFlag>;

    /// List reports for a statement
    async fn find_by_statement(&self, statement_id: StatementId) -> RepoResult<Vec<StatementFlag>>;

    /// Delete every report for a statement, returning how many were removed
    async fn delete_by_statement(&self, statement_id: StatementId) -> RepoResult<u64>;
}
