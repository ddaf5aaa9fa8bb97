//! Author database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for authors table
#[derive(Debug, Clone, FromRow)]
pub struct AuthorModel {
    pub user_id: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
