//! Response database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for responses table
#[derive(Debug, Clone, FromRow)]
pub struct ResponseModel {
    pub id: i64,
    pub statement_id: i64,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub choice: String,
    pub created_at: DateTime<Utc>,
}

impl ResponseModel {
    /// Check if the response came from a signed-in user
    #[inline]
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

/// One `(statement, choice)` group of a poll tally
#[derive(Debug, Clone, FromRow)]
pub struct TallyRowModel {
    pub statement_id: i64,
    pub choice: String,
    pub count: i64,
}
