//! Valence - the reaction a voter gives to a statement

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reaction type recorded for a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Valence {
    Agree,
    Disagree,
    Skip,
}

impl Valence {
    /// All valences in display order
    pub const ALL: [Valence; 3] = [Valence::Agree, Valence::Disagree, Valence::Skip];

    /// Database / wire representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Agree => "agree",
            Self::Disagree => "disagree",
            Self::Skip => "skip",
        }
    }
}

/// Error when parsing a valence string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid valence: {0}")]
pub struct ValenceParseError(pub String);

impl std::str::FromStr for Valence {
    type Err = ValenceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agree" => Ok(Self::Agree),
            "disagree" => Ok(Self::Disagree),
            "skip" => Ok(Self::Skip),
            other => Err(ValenceParseError(other.to_string())),
        }
    }
}

impl fmt::Display for Valence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
