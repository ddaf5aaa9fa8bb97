//! Statement database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for statements table
#[derive(Debug, Clone, FromRow)]
pub struct StatementModel {
    pub id: i64,
    pub poll_id: i64,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
