//! PostgreSQL implementation of PollRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use viewpoints_core::{
    DomainError, NewPoll, Poll, PollId, PollRepository, PollSummary, RepoResult,
};

use crate::mappers::PollInsert;
use crate::models::{PollModel, PollSummaryModel};

use super::error::{map_db_error, map_unique_violation};

const POLL_COLUMNS: &str =
    "id, user_id, slug, title, core_question, polis_id, visibility, created_at";

const POLIS_ID_CONSTRAINT: &str = "polls_polis_id_key";

/// Conflict error for a unique violation on `polls`
fn poll_conflict(constraint: Option<&str>, poll: &NewPoll) -> DomainError {
    match (constraint, &poll.polis_id) {
        (Some(POLIS_ID_CONSTRAINT), Some(polis_id)) => {
            DomainError::PolisIdAlreadyExists(polis_id.clone())
        }
        _ => DomainError::SlugAlreadyExists(poll.slug.clone()),
    }
}

/// PostgreSQL implementation of PollRepository
#[derive(Clone)]
pub struct PgPollRepository {
    pool: PgPool,
}

impl PgPollRepository {
    /// Create a new PgPollRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> RepoResult<Option<Poll>> {
        let sql = format!("SELECT {POLL_COLUMNS} FROM polls WHERE {column} = $1");
        let result = sqlx::query_as::<_, PollModel>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(Poll::from))
    }
}

#[async_trait]
impl PollRepository for PgPollRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: PollId) -> RepoResult<Option<Poll>> {
        let sql = format!("SELECT {POLL_COLUMNS} FROM polls WHERE id = $1");
        let result = sqlx::query_as::<_, PollModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(Poll::from))
    }

    #[instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Poll>> {
        self.find_one("slug", slug).await
    }

    #[instrument(skip(self))]
    async fn find_by_polis_id(&self, polis_id: &str) -> RepoResult<Option<Poll>> {
        self.find_one("polis_id", polis_id).await
    }

    #[instrument(skip(self))]
    async fn list_public(&self) -> RepoResult<Vec<PollSummary>> {
        // Respondents are distinct users or sessions; the prefix keeps a
        // user id from colliding with an equal session id.
        let results = sqlx::query_as::<_, PollSummaryModel>(
            r#"
            SELECT
                p.id, p.user_id, p.slug, p.title, p.core_question, p.polis_id,
                p.visibility, p.created_at,
                COUNT(DISTINCT s.id) AS statement_count,
                COUNT(DISTINCT COALESCE('u:' || r.user_id, 's:' || r.session_id)) AS respondent_count,
                a.user_id AS author_user_id,
                a.name AS author_name,
                a.avatar_url AS author_avatar_url
            FROM polls p
            LEFT JOIN statements s ON s.poll_id = p.id
            LEFT JOIN responses r ON r.statement_id = s.id
            LEFT JOIN authors a ON a.user_id = p.user_id
            WHERE p.visibility = 'public'
            GROUP BY p.id, a.user_id
            ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(PollSummary::from).collect())
    }

    #[instrument(skip(self))]
    async fn slug_exists(&self, slug: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM polls WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, poll, seed_statements), fields(slug = %poll.slug, seeds = seed_statements.len()))]
    async fn create(&self, poll: &NewPoll, seed_statements: &[String]) -> RepoResult<Poll> {
        let insert = PollInsert::new(poll);
        let sql = format!(
            r#"
            INSERT INTO polls (user_id, slug, title, core_question, polis_id, visibility)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {POLL_COLUMNS}
            "#
        );

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let model = sqlx::query_as::<_, PollModel>(&sql)
            .bind(insert.user_id)
            .bind(insert.slug)
            .bind(insert.title)
            .bind(insert.core_question)
            .bind(insert.polis_id)
            .bind(insert.visibility)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_unique_violation(e, |constraint| poll_conflict(constraint, poll)))?;

        for text in seed_statements {
            sqlx::query("INSERT INTO statements (poll_id, user_id, text) VALUES ($1, $2, $3)")
                .bind(model.id)
                .bind(insert.user_id)
                .bind(text)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(Poll::from(model))
    }
}
