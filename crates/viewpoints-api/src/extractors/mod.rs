//! Axum extractors for request handling
//!
//! Custom extractors for authentication, voter identity, validation,
//! path parameters and share links.

mod auth;
mod path;
mod share;
mod validated;
mod voter;

pub use auth::{AuthUser, OptionalAuthUser};
pub use path::{ApiPath, AuthorPath, PollPath, StatementPath};
pub use share::{base_url_from_headers, is_local_network, ShareLinks};
pub use validated::ValidatedJson;
pub use voter::{SessionId, Voter};
