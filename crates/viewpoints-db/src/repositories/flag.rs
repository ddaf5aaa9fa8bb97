//! PostgreSQL implementation of FlagRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use viewpoints_core::{FlagRepository, NewFlag, RepoResult, StatementFlag, StatementId};

use crate::mappers::FlagInsert;
use crate::models::FlagModel;

use super::error::{map_db_error, map_foreign_key_violation, statement_not_found};

/// PostgreSQL implementation of FlagRepository
#[derive(Clone)]
pub struct PgFlagRepository {
    pool: PgPool,
}

impl PgFlagRepository {
    /// Create a new PgFlagRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FlagRepository for PgFlagRepository {
    #[instrument(skip(self, flag), fields(statement_id = %flag.statement_id))]
    async fn create(&self, flag: &NewFlag) -> RepoResult<StatementFlag> {
        let insert = FlagInsert::new(flag);

        let model = sqlx::query_as::<_, FlagModel>(
            r#"
            INSERT INTO flagged_statements (statement_id, user_id, session_id, reason, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, statement_id, user_id, session_id, reason, description, created_at
            "#,
        )
        .bind(insert.statement_id)
        .bind(insert.user_id)
        .bind(insert.session_id)
        .bind(insert.reason)
        .bind(insert.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, || statement_not_found(flag.statement_id)))?;

        StatementFlag::try_from(model)
    }

    #[instrument(skip(self))]
    async fn find_by_statement(&self, statement_id: StatementId) -> RepoResult<Vec<StatementFlag>> {
        let results = sqlx::query_as::<_, FlagModel>(
            r#"
            SELECT id, statement_id, user_id, session_id, reason, description, created_at
            FROM flagged_statements
            WHERE statement_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(statement_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(StatementFlag::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn delete_by_statement(&self, statement_id: StatementId) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM flagged_statements WHERE statement_id = $1")
            .bind(statement_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
