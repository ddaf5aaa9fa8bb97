//! Ports implemented by the infrastructure and transport layers

mod identity;
mod repositories;
mod sink;

pub use identity::IdentityResolver;
pub use repositories::{
    AuthorRepository, FlagRepository, PollRepository, RepoResult, ResponseRepository,
    StatementRepository,
};
pub use sink::ResponseSink;
