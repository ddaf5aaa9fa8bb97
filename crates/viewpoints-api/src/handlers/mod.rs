//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod authors;
pub mod health;
pub mod polls;
pub mod responses;
pub mod statements;
pub mod voting;
