//! Business services
//!
//! Each service borrows the shared `ServiceContext` for the duration of a
//! request.

mod authz;
mod author;
mod context;
mod error;
mod poll;
mod response;
mod slug;
mod statement;
mod voting;

pub use authz::{require_poll_admin, require_poll_admin_if_private};
pub use author::AuthorService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use poll::PollService;
pub use response::ResponseService;
pub use statement::StatementService;
pub use voting::VotingService;
