//! Poll visibility

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who can find a poll and read its results
///
/// - `Public`: listed on the index, results readable by anyone
/// - `Hidden`: reachable by link only, results readable by anyone
/// - `Private`: reachable by link only, results restricted to the poll admin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollVisibility {
    #[default]
    Public,
    Hidden,
    Private,
}

impl PollVisibility {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Hidden => "hidden",
            Self::Private => "private",
        }
    }

    /// Parse the database representation, falling back to `Private` for
    /// unknown values so a bad row never leaks results.
    pub fn from_db(s: &str) -> Self {
        match s {
            "public" => Self::Public,
            "hidden" => Self::Hidden,
            _ => Self::Private,
        }
    }
}

impl fmt::Display for PollVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
