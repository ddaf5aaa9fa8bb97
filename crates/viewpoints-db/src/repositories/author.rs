//! PostgreSQL implementation of AuthorRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use viewpoints_core::{Author, AuthorRepository, RepoResult};

use crate::mappers::AuthorInsert;
use crate::models::AuthorModel;

use super::error::map_db_error;

/// PostgreSQL implementation of AuthorRepository
#[derive(Clone)]
pub struct PgAuthorRepository {
    pool: PgPool,
}

impl PgAuthorRepository {
    /// Create a new PgAuthorRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorRepository for PgAuthorRepository {
    #[instrument(skip(self))]
    async fn find(&self, user_id: &str) -> RepoResult<Option<Author>> {
        let result = sqlx::query_as::<_, AuthorModel>(
            r#"
            SELECT user_id, name, avatar_url, created_at, updated_at
            FROM authors
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Author::from))
    }

    #[instrument(skip(self))]
    async fn find_many(&self, user_ids: &[String]) -> RepoResult<Vec<Author>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = sqlx::query_as::<_, AuthorModel>(
            r#"
            SELECT user_id, name, avatar_url, created_at, updated_at
            FROM authors
            WHERE user_id = ANY($1)
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Author::from).collect())
    }

    #[instrument(skip(self, author), fields(user_id = %author.user_id))]
    async fn upsert(&self, author: &Author) -> RepoResult<()> {
        let insert = AuthorInsert::new(author);

        sqlx::query(
            r#"
            INSERT INTO authors (user_id, name, avatar_url)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id)
            DO UPDATE SET name = EXCLUDED.name,
                          avatar_url = EXCLUDED.avatar_url,
                          updated_at = NOW()
            "#,
        )
        .bind(insert.user_id)
        .bind(insert.name)
        .bind(insert.avatar_url)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
