//! Response entity - one voter's reaction to one statement

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ResponseId, StatementId, Valence, VoterIdentity};

/// Stored reaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub id: ResponseId,
    pub statement_id: StatementId,
    pub voter: VoterIdentity,
    pub valence: Valence,
    pub created_at: DateTime<Utc>,
}

/// Write payload for recording a reaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NewResponse {
    pub statement_id: StatementId,
    pub voter: VoterIdentity,
    pub valence: Valence,
}

impl NewResponse {
    pub fn new(statement_id: StatementId, voter: VoterIdentity, valence: Valence) -> Self {
        Self {
            statement_id,
            voter,
            valence,
        }
    }
}

/// Aggregated reactions for one statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementTally {
    pub statement_id: StatementId,
    pub agree: i64,
    pub disagree: i64,
    pub skip: i64,
}

impl StatementTally {
    /// Empty tally for a statement nobody reacted to yet
    pub fn empty(statement_id: StatementId) -> Self {
        Self {
            statement_id,
            agree: 0,
            disagree: 0,
            skip: 0,
        }
    }

    /// Add `count` reactions of the given valence
    pub fn add(&mut self, valence: Valence, count: i64) {
        match valence {
            Valence::Agree => self.agree += count,
            Valence::Disagree => self.disagree += count,
            Valence::Skip => self.skip += count,
        }
    }

    #[inline]
    pub fn total(&self) -> i64 {
        self.agree + self.disagree + self.skip
    }

    /// Share of agreeing votes among non-skip votes, if any were cast
    pub fn agreement(&self) -> Option<f64> {
        let decided = self.agree + self.disagree;
        if decided == 0 {
            None
        } else {
            Some(self.agree as f64 / decided as f64)
        }
    }
}
