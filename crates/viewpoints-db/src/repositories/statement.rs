//! PostgreSQL implementation of StatementRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use viewpoints_core::{
    DomainError, NewStatement, PollId, RepoResult, Statement, StatementId, StatementRepository,
    VoterIdentity,
};

use crate::mappers::{identity_columns, StatementInsert};
use crate::models::StatementModel;

use super::error::{map_db_error, map_foreign_key_violation, statement_not_found};

/// PostgreSQL implementation of StatementRepository
#[derive(Clone)]
pub struct PgStatementRepository {
    pool: PgPool,
}

impl PgStatementRepository {
    /// Create a new PgStatementRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatementRepository for PgStatementRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: StatementId) -> RepoResult<Option<Statement>> {
        let result = sqlx::query_as::<_, StatementModel>(
            r#"
            SELECT id, poll_id, user_id, session_id, text, created_at
            FROM statements
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Statement::from))
    }

    #[instrument(skip(self))]
    async fn find_by_poll(&self, poll_id: PollId) -> RepoResult<Vec<Statement>> {
        let results = sqlx::query_as::<_, StatementModel>(
            r#"
            SELECT id, poll_id, user_id, session_id, text, created_at
            FROM statements
            WHERE poll_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(poll_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Statement::from).collect())
    }

    #[instrument(skip(self, voter), fields(voter = %voter))]
    async fn find_unanswered(
        &self,
        poll_id: PollId,
        voter: &VoterIdentity,
    ) -> RepoResult<Vec<Statement>> {
        let (user_id, session_id) = identity_columns(Some(voter));

        // `= NULL` never matches, so only the voter's own column applies
        let results = sqlx::query_as::<_, StatementModel>(
            r#"
            SELECT s.id, s.poll_id, s.user_id, s.session_id, s.text, s.created_at
            FROM statements s
            WHERE s.poll_id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM responses r
                  WHERE r.statement_id = s.id
                    AND (r.user_id = $2 OR r.session_id = $3)
              )
            ORDER BY s.created_at ASC, s.id ASC
            "#,
        )
        .bind(poll_id.into_inner())
        .bind(user_id)
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Statement::from).collect())
    }

    #[instrument(skip(self, statement), fields(poll_id = %statement.poll_id))]
    async fn create(&self, statement: &NewStatement) -> RepoResult<Statement> {
        let insert = StatementInsert::new(statement);

        let model = sqlx::query_as::<_, StatementModel>(
            r#"
            INSERT INTO statements (poll_id, user_id, session_id, text)
            VALUES ($1, $2, $3, $4)
            RETURNING id, poll_id, user_id, session_id, text, created_at
            "#,
        )
        .bind(insert.poll_id)
        .bind(insert.user_id)
        .bind(insert.session_id)
        .bind(insert.text)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, || DomainError::PollNotFound(statement.poll_id)))?;

        Ok(Statement::from(model))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: StatementId) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM statements WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(statement_not_found(id));
        }

        Ok(())
    }
}
