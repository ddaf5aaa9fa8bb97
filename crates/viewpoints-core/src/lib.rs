//! # viewpoints-core
//!
//! Domain layer containing entities, value objects, domain errors and the
//! ports (repository, persistence sink, identity resolver) the rest of the
//! workspace implements. No infrastructure dependencies live here.

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Author, NewFlag, NewPoll, NewResponse, NewStatement, Poll, PollSummary, Response, Statement,
    StatementFlag, StatementTally,
};
pub use error::DomainError;
pub use traits::{
    AuthorRepository, FlagRepository, IdentityResolver, PollRepository, RepoResult,
    ResponseRepository, ResponseSink, StatementRepository,
};
pub use value_objects::{
    FlagId, IdParseError, PollId, PollVisibility, ResolvedIdentity, ResponseId, StatementId,
    Valence, ValenceParseError, VoterIdentity,
};
