//! Voter identity
//!
//! A reaction is keyed either by an authenticated user id (issued by the
//! identity provider) or by an anonymous session id (cookie), never both.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::traits::IdentityResolver;

/// Who is voting
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoterIdentity {
    /// Authenticated user id
    User(String),
    /// Anonymous session id
    Session(String),
}

impl VoterIdentity {
    /// User id, if authenticated
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::User(id) => Some(id),
            Self::Session(_) => None,
        }
    }

    /// Session id, if anonymous
    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::User(_) => None,
            Self::Session(id) => Some(id),
        }
    }

    #[inline]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::User(_))
    }

    /// Rebuild from the two nullable columns of a row. Returns `None` when
    /// both are null; the user id wins when both are set.
    pub fn from_columns(user_id: Option<String>, session_id: Option<String>) -> Option<Self> {
        match (user_id, session_id) {
            (Some(user), _) => Some(Self::User(user)),
            (None, Some(session)) => Some(Self::Session(session)),
            (None, None) => None,
        }
    }
}

impl fmt::Display for VoterIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{id}"),
            Self::Session(id) => write!(f, "session:{id}"),
        }
    }
}

/// The identities found on a single request
///
/// Either side may be missing; resolution prefers the authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
}

impl ResolvedIdentity {
    pub fn new(user_id: Option<String>, session_id: Option<String>) -> Self {
        Self {
            user_id: user_id.filter(|s| !s.is_empty()),
            session_id: session_id.filter(|s| !s.is_empty()),
        }
    }
}

impl IdentityResolver for ResolvedIdentity {
    fn resolve(&self) -> Option<VoterIdentity> {
        VoterIdentity::from_columns(self.user_id.clone(), self.session_id.clone())
    }
}
