//! Typed row identifiers
//!
//! Every table uses a `BIGSERIAL` primary key. Wrapping the raw `i64` in a
//! newtype per table keeps a statement id from being passed where a poll id
//! is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error when parsing an identifier from a path segment or query string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("invalid identifier format")]
    InvalidFormat,
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create an identifier from a raw database value
            #[inline]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the inner i64 value
            #[inline]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .ok()
                    .filter(|id| *id > 0)
                    .map(Self)
                    .ok_or(IdParseError::InvalidFormat)
            }
        }
    };
}

define_id!(
    /// Poll primary key
    PollId
);
define_id!(
    /// Statement primary key
    StatementId
);
define_id!(
    /// Response (reaction) primary key
    ResponseId
);
define_id!(
    /// Statement flag primary key
    FlagId
);
