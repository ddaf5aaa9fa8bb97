//! Statement flag database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for flagged_statements table
#[derive(Debug, Clone, FromRow)]
pub struct FlagModel {
    pub id: i64,
    pub statement_id: i64,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub reason: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
