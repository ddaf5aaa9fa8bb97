//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in
//! viewpoints-core. Each repository handles database operations for one
//! table (plus the joins its queries need).

mod author;
mod error;
mod flag;
mod poll;
mod response;
mod statement;

pub use author::PgAuthorRepository;
pub use flag::PgFlagRepository;
pub use poll::PgPollRepository;
pub use response::PgResponseRepository;
pub use statement::PgStatementRepository;
