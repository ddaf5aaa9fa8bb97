//! Domain entities - core business objects

mod author;
mod flag;
mod poll;
mod response;
mod statement;

pub use author::Author;
pub use flag::{NewFlag, StatementFlag};
pub use poll::{NewPoll, Poll, PollSummary};
pub use response::{NewResponse, Response, StatementTally};
pub use statement::{NewStatement, Statement};
