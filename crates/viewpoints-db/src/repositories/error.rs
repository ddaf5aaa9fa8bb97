//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use viewpoints_core::{DomainError, StatementId};

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
///
/// The callback receives the name of the violated constraint when the
/// driver reports one.
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce(Option<&str>) -> DomainError,
{
    match e.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => on_unique(db_err.constraint()),
        _ => map_db_error(e),
    }
}

/// Check for a foreign key violation (missing parent row)
pub fn map_foreign_key_violation<F>(e: SqlxError, on_missing: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    match e.as_database_error() {
        Some(db_err) if db_err.is_foreign_key_violation() => on_missing(),
        _ => map_db_error(e),
    }
}

/// Create a "statement not found" error
pub fn statement_not_found(id: StatementId) -> DomainError {
    DomainError::StatementNotFound(id)
}
