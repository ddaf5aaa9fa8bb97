//! Poll database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for polls table
#[derive(Debug, Clone, FromRow)]
pub struct PollModel {
    pub id: i64,
    pub user_id: String,
    pub slug: String,
    pub title: String,
    pub core_question: String,
    pub polis_id: Option<String>,
    pub visibility: String,
    pub created_at: DateTime<Utc>,
}

/// Poll row joined with its counts and the owner's author card
#[derive(Debug, Clone, FromRow)]
pub struct PollSummaryModel {
    #[sqlx(flatten)]
    pub poll: PollModel,
    pub statement_count: i64,
    pub respondent_count: i64,
    pub author_user_id: Option<String>,
    pub author_name: Option<String>,
    pub author_avatar_url: Option<String>,
}
