//! Model to entity mappers
//!
//! Conversions from database rows to `viewpoints-core` entities.
//! - `From<Model> for Entity` where every row maps cleanly
//! - `TryFrom<Model>` where a row can violate a domain invariant (voter
//!   columns, stored valence) and must surface as a `DomainError`
//! - `*Insert` structs flatten an entity's identity into the two nullable
//!   `user_id` / `session_id` columns

mod author;
mod flag;
mod poll;
mod response;
mod statement;

pub use author::AuthorInsert;
pub use flag::FlagInsert;
pub use poll::PollInsert;
pub use response::{tallies_from_rows, ResponseInsert};
pub use statement::StatementInsert;

use viewpoints_core::{DomainError, VoterIdentity};

/// Identity columns of a row as `(user_id, session_id)`
pub fn identity_columns(voter: Option<&VoterIdentity>) -> (Option<&str>, Option<&str>) {
    match voter {
        Some(VoterIdentity::User(id)) => (Some(id.as_str()), None),
        Some(VoterIdentity::Session(id)) => (None, Some(id.as_str())),
        None => (None, None),
    }
}

/// Rebuild a required voter identity from its columns
pub(crate) fn required_identity(
    table: &str,
    id: i64,
    user_id: Option<String>,
    session_id: Option<String>,
) -> Result<VoterIdentity, DomainError> {
    VoterIdentity::from_columns(user_id, session_id).ok_or_else(|| {
        DomainError::DatabaseError(format!("{table} row {id} has neither user_id nor session_id"))
    })
}
