//! Identity-provider token verification

mod token;

pub use token::{Claims, IdentityTokenService};
