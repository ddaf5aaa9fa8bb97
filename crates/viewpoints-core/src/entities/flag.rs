//! Statement flags - reports raised against a statement

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::{FlagId, StatementId, VoterIdentity};

/// A report against a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementFlag {
    pub id: FlagId,
    pub statement_id: StatementId,
    pub reporter: VoterIdentity,
    pub reason: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Values needed to insert a flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFlag {
    pub statement_id: StatementId,
    pub reporter: VoterIdentity,
    pub reason: String,
    pub description: Option<String>,
}

impl NewFlag {
    pub const MAX_REASON_LEN: usize = 64;

    pub fn new(
        statement_id: StatementId,
        reporter: VoterIdentity,
        reason: &str,
        description: Option<String>,
    ) -> Result<Self, DomainError> {
        let reason = reason.trim();
        if reason.is_empty() || reason.chars().count() > Self::MAX_REASON_LEN {
            return Err(DomainError::ValidationError(format!(
                "flag reason must be 1-{} characters",
                Self::MAX_REASON_LEN
            )));
        }

        Ok(Self {
            statement_id,
            reporter,
            reason: reason.to_string(),
            description: description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        })
    }
}
