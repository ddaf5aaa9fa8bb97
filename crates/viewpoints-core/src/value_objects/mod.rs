//! Value objects - immutable types that represent domain concepts

mod ids;
mod valence;
mod visibility;
mod voter;

pub use ids::{FlagId, IdParseError, PollId, ResponseId, StatementId};
pub use valence::{Valence, ValenceParseError};
pub use visibility::PollVisibility;
pub use voter::{ResolvedIdentity, VoterIdentity};
