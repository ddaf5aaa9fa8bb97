//! Service context - dependency container for services
//!
//! Holds the repositories, the response sink and the voting session
//! registry. Everything is injected; nothing is read from globals.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use viewpoints_core::{
    AuthorRepository, FlagRepository, PollRepository, ResponseRepository, ResponseSink,
    StatementRepository,
};
use viewpoints_db::{
    PgAuthorRepository, PgFlagRepository, PgPollRepository, PgPool, PgResponseRepository,
    PgStatementRepository,
};

use super::error::{ServiceError, ServiceResult};
use crate::voting::VotingSessionRegistry;

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    poll_repo: Arc<dyn PollRepository>,
    statement_repo: Arc<dyn StatementRepository>,
    response_repo: Arc<dyn ResponseRepository>,
    author_repo: Arc<dyn AuthorRepository>,
    flag_repo: Arc<dyn FlagRepository>,
    sessions: Arc<VotingSessionRegistry>,
}

impl ServiceContext {
    /// Create a new service context
    ///
    /// The voting session registry is built from `statement_repo` and `sink`.
    pub fn new(
        poll_repo: Arc<dyn PollRepository>,
        statement_repo: Arc<dyn StatementRepository>,
        response_repo: Arc<dyn ResponseRepository>,
        author_repo: Arc<dyn AuthorRepository>,
        flag_repo: Arc<dyn FlagRepository>,
        sink: Arc<dyn ResponseSink>,
    ) -> Self {
        let sessions = Arc::new(VotingSessionRegistry::new(Arc::clone(&statement_repo), sink));
        Self {
            poll_repo,
            statement_repo,
            response_repo,
            author_repo,
            flag_repo,
            sessions,
        }
    }

    /// Wire every repository to PostgreSQL
    pub fn postgres(pool: &PgPool) -> Self {
        let responses = Arc::new(PgResponseRepository::new(pool.clone()));
        Self::new(
            Arc::new(PgPollRepository::new(pool.clone())),
            Arc::new(PgStatementRepository::new(pool.clone())),
            responses.clone(),
            Arc::new(PgAuthorRepository::new(pool.clone())),
            Arc::new(PgFlagRepository::new(pool.clone())),
            responses,
        )
    }

    // === Repositories ===

    pub fn poll_repo(&self) -> &dyn PollRepository {
        self.poll_repo.as_ref()
    }

    pub fn statement_repo(&self) -> &dyn StatementRepository {
        self.statement_repo.as_ref()
    }

    pub fn response_repo(&self) -> &dyn ResponseRepository {
        self.response_repo.as_ref()
    }

    pub fn author_repo(&self) -> &dyn AuthorRepository {
        self.author_repo.as_ref()
    }

    pub fn flag_repo(&self) -> &dyn FlagRepository {
        self.flag_repo.as_ref()
    }

    // === Voting ===

    /// Live voting sessions
    pub fn sessions(&self) -> &VotingSessionRegistry {
        self.sessions.as_ref()
    }

    /// Start dropping voting sessions left idle for `max_idle`
    pub fn spawn_session_sweeper(&self, max_idle: Duration) -> JoinHandle<()> {
        self.sessions.spawn_sweeper(max_idle)
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("sessions", &self.sessions)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom implementations
#[derive(Default)]
pub struct ServiceContextBuilder {
    poll_repo: Option<Arc<dyn PollRepository>>,
    statement_repo: Option<Arc<dyn StatementRepository>>,
    response_repo: Option<Arc<dyn ResponseRepository>>,
    author_repo: Option<Arc<dyn AuthorRepository>>,
    flag_repo: Option<Arc<dyn FlagRepository>>,
    sink: Option<Arc<dyn ResponseSink>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll_repo(mut self, repo: Arc<dyn PollRepository>) -> Self {
        self.poll_repo = Some(repo);
        self
    }

    pub fn statement_repo(mut self, repo: Arc<dyn StatementRepository>) -> Self {
        self.statement_repo = Some(repo);
        self
    }

    pub fn response_repo(mut self, repo: Arc<dyn ResponseRepository>) -> Self {
        self.response_repo = Some(repo);
        self
    }

    pub fn author_repo(mut self, repo: Arc<dyn AuthorRepository>) -> Self {
        self.author_repo = Some(repo);
        self
    }

    pub fn flag_repo(mut self, repo: Arc<dyn FlagRepository>) -> Self {
        self.flag_repo = Some(repo);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn ResponseSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        Ok(ServiceContext::new(
            required(self.poll_repo, "poll_repo")?,
            required(self.statement_repo, "statement_repo")?,
            required(self.response_repo, "response_repo")?,
            required(self.author_repo, "author_repo")?,
            required(self.flag_repo, "flag_repo")?,
            required(self.sink, "sink")?,
        ))
    }
}
