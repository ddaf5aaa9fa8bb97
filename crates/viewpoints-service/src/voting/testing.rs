//! In-memory fakes shared by the service tests

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use viewpoints_core::{
    Author, AuthorRepository, DomainError, FlagId, FlagRepository, NewFlag, NewPoll, NewResponse,
    NewStatement, Poll, PollId, PollRepository, PollSummary, RepoResult, Response, ResponseId,
    ResponseRepository, ResponseSink, Statement, StatementFlag, StatementId, StatementRepository,
    StatementTally, VoterIdentity,
};

fn at(offset: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + offset, 0).unwrap()
}

/// Statement `id` of poll 1 with a timestamp ordered by id
pub fn statement(id: i64) -> Statement {
    Statement {
        id: StatementId::new(id),
        poll_id: PollId::new(1),
        author: None,
        text: format!("Statement {id}"),
        created_at: at(id),
    }
}

pub fn statements(ids: RangeInclusive<i64>) -> Vec<Statement> {
    ids.map(statement).collect()
}

#[derive(Clone, Copy)]
enum SinkMode {
    Ok,
    Fail,
    Hang,
}

/// Response sink that records every write attempt
pub struct RecordingSink {
    mode: SinkMode,
    attempts: Mutex<usize>,
    recorded: Mutex<Vec<NewResponse>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::with_mode(SinkMode::Ok)
    }

    /// Every write fails with a database error
    pub fn failing() -> Self {
        Self::with_mode(SinkMode::Fail)
    }

    /// Every write never completes
    pub fn hanging() -> Self {
        Self::with_mode(SinkMode::Hang)
    }

    fn with_mode(mode: SinkMode) -> Self {
        Self {
            mode,
            attempts: Mutex::new(0),
            recorded: Mutex::new(Vec::new()),
        }
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock()
    }

    /// Payloads of the writes that succeeded
    pub fn recorded(&self) -> Vec<NewResponse> {
        self.recorded.lock().clone()
    }
}

#[async_trait]
impl ResponseSink for RecordingSink {
    async fn record(&self, response: &NewResponse) -> RepoResult<Response> {
        *self.attempts.lock() += 1;
        match self.mode {
            SinkMode::Fail => Err(DomainError::DatabaseError("connection reset".into())),
            SinkMode::Hang => std::future::pending().await,
            SinkMode::Ok => {
                let mut recorded = self.recorded.lock();
                recorded.push(response.clone());
                Ok(Response {
                    id: ResponseId::new(recorded.len() as i64),
                    statement_id: response.statement_id,
                    voter: response.voter.clone(),
                    valence: response.valence,
                    created_at: Utc::now(),
                })
            }
        }
    }
}

/// In-memory store implementing every repository port
#[derive(Default)]
pub struct MemoryStore {
    polls: Mutex<Vec<Poll>>,
    statements: Mutex<Vec<Statement>>,
    responses: Mutex<Vec<Response>>,
    authors: Mutex<HashMap<String, Author>>,
    flags: Mutex<Vec<StatementFlag>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_poll(&self, poll: Poll) {
        self.polls.lock().push(poll);
    }

    pub fn insert_statement(&self, statement: Statement) {
        self.statements.lock().push(statement);
    }

    pub fn responses(&self) -> Vec<Response> {
        self.responses.lock().clone()
    }

    pub fn statement_count(&self) -> usize {
        self.statements.lock().len()
    }

    fn statement_poll(&self, id: StatementId) -> Option<PollId> {
        self.statements
            .lock()
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.poll_id)
    }
}

#[async_trait]
impl PollRepository for MemoryStore {
    async fn find_by_id(&self, id: PollId) -> RepoResult<Option<Poll>> {
        Ok(self.polls.lock().iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Poll>> {
        Ok(self.polls.lock().iter().find(|p| p.slug == slug).cloned())
    }

    async fn find_by_polis_id(&self, polis_id: &str) -> RepoResult<Option<Poll>> {
        Ok(self
            .polls
            .lock()
            .iter()
            .find(|p| p.polis_id.as_deref() == Some(polis_id))
            .cloned())
    }

    async fn list_public(&self) -> RepoResult<Vec<PollSummary>> {
        let mut polls: Vec<Poll> = self
            .polls
            .lock()
            .iter()
            .filter(|p| p.is_public())
            .cloned()
            .collect();
        polls.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut summaries = Vec::with_capacity(polls.len());
        for poll in polls {
            let statement_count = self
                .statements
                .lock()
                .iter()
                .filter(|s| s.poll_id == poll.id)
                .count() as i64;
            let respondent_count = self.count_respondents(poll.id).await?;
            let author = self.authors.lock().get(&poll.user_id).cloned();
            summaries.push(PollSummary {
                poll,
                statement_count,
                respondent_count,
                author,
            });
        }
        Ok(summaries)
    }

    async fn slug_exists(&self, slug: &str) -> RepoResult<bool> {
        Ok(self.polls.lock().iter().any(|p| p.slug == slug))
    }

    async fn create(&self, new: &NewPoll, seed_statements: &[String]) -> RepoResult<Poll> {
        let mut polls = self.polls.lock();
        if polls.iter().any(|p| p.slug == new.slug) {
            return Err(DomainError::SlugAlreadyExists(new.slug.clone()));
        }
        if let Some(polis_id) = &new.polis_id {
            if polls.iter().any(|p| p.polis_id.as_ref() == Some(polis_id)) {
                return Err(DomainError::PolisIdAlreadyExists(polis_id.clone()));
            }
        }
        let poll = Poll {
            id: PollId::new(polls.len() as i64 + 100),
            user_id: new.user_id.clone(),
            slug: new.slug.clone(),
            title: new.title.clone(),
            core_question: new.core_question.clone(),
            polis_id: new.polis_id.clone(),
            visibility: new.visibility,
            created_at: Utc::now(),
        };
        polls.push(poll.clone());

        let mut statements = self.statements.lock();
        for text in seed_statements {
            let next_id = statements.iter().map(|s| s.id.into_inner()).max().unwrap_or(0) + 1;
            statements.push(Statement {
                id: StatementId::new(next_id),
                poll_id: poll.id,
                author: Some(VoterIdentity::User(new.user_id.clone())),
                text: text.clone(),
                created_at: Utc::now(),
            });
        }
        Ok(poll)
    }
}

#[async_trait]
impl StatementRepository for MemoryStore {
    async fn find_by_id(&self, id: StatementId) -> RepoResult<Option<Statement>> {
        Ok(self.statements.lock().iter().find(|s| s.id == id).cloned())
    }

    async fn find_by_poll(&self, poll_id: PollId) -> RepoResult<Vec<Statement>> {
        let mut found: Vec<Statement> = self
            .statements
            .lock()
            .iter()
            .filter(|s| s.poll_id == poll_id)
            .cloned()
            .collect();
        found.sort_by_key(|s| (s.created_at, s.id));
        Ok(found)
    }

    async fn find_unanswered(
        &self,
        poll_id: PollId,
        voter: &VoterIdentity,
    ) -> RepoResult<Vec<Statement>> {
        let answered: Vec<StatementId> = self
            .responses
            .lock()
            .iter()
            .filter(|r| &r.voter == voter)
            .map(|r| r.statement_id)
            .collect();
        let all = StatementRepository::find_by_poll(self, poll_id).await?;
        Ok(all
            .into_iter()
            .filter(|s| !answered.contains(&s.id))
            .collect())
    }

    async fn create(&self, new: &NewStatement) -> RepoResult<Statement> {
        if self.polls.lock().iter().all(|p| p.id != new.poll_id) {
            return Err(DomainError::PollNotFound(new.poll_id));
        }
        let mut statements = self.statements.lock();
        let next_id = statements.iter().map(|s| s.id.into_inner()).max().unwrap_or(0) + 1;
        let statement = Statement {
            id: StatementId::new(next_id),
            poll_id: new.poll_id,
            author: new.author.clone(),
            text: new.text.clone(),
            created_at: Utc::now(),
        };
        statements.push(statement.clone());
        Ok(statement)
    }

    async fn delete(&self, id: StatementId) -> RepoResult<()> {
        let mut statements = self.statements.lock();
        let before = statements.len();
        statements.retain(|s| s.id != id);
        if statements.len() == before {
            return Err(DomainError::StatementNotFound(id));
        }
        self.responses.lock().retain(|r| r.statement_id != id);
        self.flags.lock().retain(|f| f.statement_id != id);
        Ok(())
    }
}

#[async_trait]
impl ResponseRepository for MemoryStore {
    async fn find_by_poll(
        &self,
        poll_id: PollId,
        voter: Option<&VoterIdentity>,
    ) -> RepoResult<Vec<Response>> {
        let responses = self.responses();
        Ok(responses
            .into_iter()
            .filter(|r| self.statement_poll(r.statement_id) == Some(poll_id))
            .filter(|r| voter.map_or(true, |v| &r.voter == v))
            .collect())
    }

    async fn tally_by_poll(&self, poll_id: PollId) -> RepoResult<Vec<StatementTally>> {
        let statements = StatementRepository::find_by_poll(self, poll_id).await?;
        let responses = self.responses();
        Ok(statements
            .iter()
            .map(|s| {
                let mut tally = StatementTally::empty(s.id);
                for r in responses.iter().filter(|r| r.statement_id == s.id) {
                    tally.add(r.valence, 1);
                }
                tally
            })
            .collect())
    }

    async fn count_respondents(&self, poll_id: PollId) -> RepoResult<i64> {
        let mut voters: Vec<VoterIdentity> = self
            .responses()
            .into_iter()
            .filter(|r| self.statement_poll(r.statement_id) == Some(poll_id))
            .map(|r| r.voter)
            .collect();
        voters.sort_by_key(ToString::to_string);
        voters.dedup();
        Ok(voters.len() as i64)
    }
}

#[async_trait]
impl ResponseSink for MemoryStore {
    async fn record(&self, new: &NewResponse) -> RepoResult<Response> {
        if self.statement_poll(new.statement_id).is_none() {
            return Err(DomainError::StatementNotFound(new.statement_id));
        }
        let mut responses = self.responses.lock();
        let response = Response {
            id: ResponseId::new(responses.len() as i64 + 1),
            statement_id: new.statement_id,
            voter: new.voter.clone(),
            valence: new.valence,
            created_at: Utc::now(),
        };
        responses.push(response.clone());
        Ok(response)
    }
}

#[async_trait]
impl AuthorRepository for MemoryStore {
    async fn find(&self, user_id: &str) -> RepoResult<Option<Author>> {
        Ok(self.authors.lock().get(user_id).cloned())
    }

    async fn find_many(&self, user_ids: &[String]) -> RepoResult<Vec<Author>> {
        let authors = self.authors.lock();
        Ok(user_ids.iter().filter_map(|id| authors.get(id).cloned()).collect())
    }

    async fn upsert(&self, author: &Author) -> RepoResult<()> {
        self.authors
            .lock()
            .insert(author.user_id.clone(), author.clone());
        Ok(())
    }
}

#[async_trait]
impl FlagRepository for MemoryStore {
    async fn create(&self, new: &NewFlag) -> RepoResult<StatementFlag> {
        if self.statement_poll(new.statement_id).is_none() {
            return Err(DomainError::StatementNotFound(new.statement_id));
        }
        let mut flags = self.flags.lock();
        let flag = StatementFlag {
            id: FlagId::new(flags.len() as i64 + 1),
            statement_id: new.statement_id,
            reporter: new.reporter.clone(),
            reason: new.reason.clone(),
            description: new.description.clone(),
            created_at: Utc::now(),
        };
        flags.push(flag.clone());
        Ok(flag)
    }

    async fn find_by_statement(&self, statement_id: StatementId) -> RepoResult<Vec<StatementFlag>> {
        Ok(self
            .flags
            .lock()
            .iter()
            .filter(|f| f.statement_id == statement_id)
            .cloned()
            .collect())
    }

    async fn delete_by_statement(&self, statement_id: StatementId) -> RepoResult<u64> {
        let mut flags = self.flags.lock();
        let before = flags.len();
        flags.retain(|f| f.statement_id != statement_id);
        Ok((before - flags.len()) as u64)
    }
}

/// Service context backed entirely by `store`
pub fn memory_context(store: Arc<MemoryStore>) -> crate::services::ServiceContext {
    crate::services::ServiceContextBuilder::new()
        .poll_repo(store.clone())
        .statement_repo(store.clone())
        .response_repo(store.clone())
        .author_repo(store.clone())
        .flag_repo(store.clone())
        .sink(store)
        .build()
        .unwrap()
}
