//! Statement entity - a single poll item a respondent reacts to

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::{PollId, StatementId, VoterIdentity};

/// Statement entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub id: StatementId,
    pub poll_id: PollId,
    /// Who submitted the statement, when known
    pub author: Option<VoterIdentity>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Statement {
    /// Maximum statement length in characters
    pub const MAX_TEXT_LEN: usize = 140;

    /// Trim and validate statement text
    pub fn normalize_text(text: &str) -> Result<String, DomainError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyStatement);
        }
        if trimmed.chars().count() > Self::MAX_TEXT_LEN {
            return Err(DomainError::StatementTooLong {
                max: Self::MAX_TEXT_LEN,
            });
        }
        Ok(trimmed.to_string())
    }
}

/// Values needed to insert a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStatement {
    pub poll_id: PollId,
    pub author: Option<VoterIdentity>,
    pub text: String,
}

impl NewStatement {
    /// Build a statement insert, validating the text
    pub fn new(
        poll_id: PollId,
        author: Option<VoterIdentity>,
        text: &str,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            poll_id,
            author,
            text: Statement::normalize_text(text)?,
        })
    }
}
