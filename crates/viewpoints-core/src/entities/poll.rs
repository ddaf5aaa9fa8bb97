//! Poll entity - a set of statements voters react to

use chrono::{DateTime, Utc};

use crate::entities::Author;
use crate::value_objects::{PollId, PollVisibility};

/// Poll entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poll {
    pub id: PollId,
    /// Owner (poll admin) user id
    pub user_id: String,
    pub slug: String,
    pub title: String,
    pub core_question: String,
    /// Identifier used by the embeddable (iframe) view
    pub polis_id: Option<String>,
    pub visibility: PollVisibility,
    pub created_at: DateTime<Utc>,
}

impl Poll {
    /// Maximum title length
    pub const MAX_TITLE_LEN: usize = 200;

    /// Check whether `user_id` is the poll admin
    pub fn is_owned_by(&self, user_id: Option<&str>) -> bool {
        user_id.is_some_and(|id| id == self.user_id)
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        self.visibility == PollVisibility::Public
    }

    #[inline]
    pub fn is_private(&self) -> bool {
        self.visibility == PollVisibility::Private
    }
}

/// Values needed to insert a poll; the id and timestamp come from the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPoll {
    pub user_id: String,
    pub slug: String,
    pub title: String,
    pub core_question: String,
    pub polis_id: Option<String>,
    pub visibility: PollVisibility,
}

/// A listed poll with its aggregate counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSummary {
    pub poll: Poll,
    pub statement_count: i64,
    /// Distinct voters (user or session) who reacted to any statement
    pub respondent_count: i64,
    pub author: Option<Author>,
}
