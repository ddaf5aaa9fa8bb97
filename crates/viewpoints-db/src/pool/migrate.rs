//! Schema migrations

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use std::path::Path;

/// Directory holding the SQL migrations shipped with this crate
pub const MIGRATIONS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/migrations");

/// Apply pending migrations from `dir` (defaults to [`MIGRATIONS_DIR`])
pub async fn run_migrations(pool: &PgPool, dir: Option<&Path>) -> Result<(), MigrateError> {
    let dir = dir.unwrap_or_else(|| Path::new(MIGRATIONS_DIR));
    let migrator = Migrator::new(dir).await?;

    tracing::info!(
        path = %dir.display(),
        count = migrator.iter().count(),
        "Running database migrations"
    );

    migrator.run(pool).await
}
