//! Database models - SQLx-compatible structs for PostgreSQL tables

mod author;
mod flag;
mod poll;
mod response;
mod statement;

pub use author::AuthorModel;
pub use flag::FlagModel;
pub use poll::{PollModel, PollSummaryModel};
pub use response::{ResponseModel, TallyRowModel};
pub use statement::StatementModel;
