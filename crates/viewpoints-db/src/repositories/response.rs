//! PostgreSQL implementation of ResponseRepository and ResponseSink

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use viewpoints_core::{
    NewResponse, PollId, RepoResult, Response, ResponseRepository, ResponseSink, StatementId,
    StatementTally, VoterIdentity,
};

use crate::mappers::{identity_columns, tallies_from_rows, ResponseInsert};
use crate::models::{ResponseModel, TallyRowModel};

use super::error::{map_db_error, map_foreign_key_violation, statement_not_found};

/// PostgreSQL implementation of ResponseRepository
///
/// Also the production [`ResponseSink`]: each `record` is a single INSERT.
#[derive(Clone)]
pub struct PgResponseRepository {
    pool: PgPool,
}

impl PgResponseRepository {
    /// Create a new PgResponseRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResponseRepository for PgResponseRepository {
    #[instrument(skip(self))]
    async fn find_by_poll(
        &self,
        poll_id: PollId,
        voter: Option<&VoterIdentity>,
    ) -> RepoResult<Vec<Response>> {
        let (user_id, session_id) = identity_columns(voter);

        let results = sqlx::query_as::<_, ResponseModel>(
            r#"
            SELECT r.id, r.statement_id, r.user_id, r.session_id, r.choice, r.created_at
            FROM responses r
            JOIN statements s ON s.id = r.statement_id
            WHERE s.poll_id = $1
              AND ($2::text IS NULL OR r.user_id = $2)
              AND ($3::text IS NULL OR r.session_id = $3)
            ORDER BY r.created_at ASC, r.id ASC
            "#,
        )
        .bind(poll_id.into_inner())
        .bind(user_id)
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Response::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn tally_by_poll(&self, poll_id: PollId) -> RepoResult<Vec<StatementTally>> {
        let statement_ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT id FROM statements
            WHERE poll_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(poll_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let rows = sqlx::query_as::<_, TallyRowModel>(
            r#"
            SELECT r.statement_id, r.choice, COUNT(*) AS count
            FROM responses r
            JOIN statements s ON s.id = r.statement_id
            WHERE s.poll_id = $1
            GROUP BY r.statement_id, r.choice
            "#,
        )
        .bind(poll_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let ids: Vec<StatementId> = statement_ids.into_iter().map(StatementId::new).collect();
        tallies_from_rows(&ids, rows)
    }

    #[instrument(skip(self))]
    async fn count_respondents(&self, poll_id: PollId) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(DISTINCT COALESCE('u:' || r.user_id, 's:' || r.session_id))
            FROM responses r
            JOIN statements s ON s.id = r.statement_id
            WHERE s.poll_id = $1
            "#,
        )
        .bind(poll_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}

#[async_trait]
impl ResponseSink for PgResponseRepository {
    #[instrument(
        skip(self, response),
        fields(statement_id = %response.statement_id, valence = %response.valence)
    )]
    async fn record(&self, response: &NewResponse) -> RepoResult<Response> {
        let insert = ResponseInsert::new(response);

        let model = sqlx::query_as::<_, ResponseModel>(
            r#"
            INSERT INTO responses (statement_id, user_id, session_id, choice)
            VALUES ($1, $2, $3, $4)
            RETURNING id, statement_id, user_id, session_id, choice, created_at
            "#,
        )
        .bind(insert.statement_id)
        .bind(insert.user_id)
        .bind(insert.session_id)
        .bind(insert.choice)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, || statement_not_found(response.statement_id)))?;

        Response::try_from(model)
    }
}
