//! # viewpoints-db
//!
//! Database layer implementing the repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for the repository traits
//! defined in `viewpoints-core`. It handles:
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Model -> entity mappers
//! - Repository implementations, including the [`ResponseSink`] voting
//!   sessions write reactions to
//!
//! ## Usage
//!
//! ```rust,ignore
//! use viewpoints_db::{create_pool, run_migrations, PgPollRepository, PoolConfig};
//! use viewpoints_core::PollRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::new("postgres://localhost/viewpoints")).await?;
//!     run_migrations(&pool, None).await?;
//!
//!     let polls = PgPollRepository::new(pool);
//!     let listed = polls.list_public().await?;
//!     Ok(())
//! }
//! ```
//!
//! [`ResponseSink`]: viewpoints_core::ResponseSink

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, PgPool, PoolConfig, MIGRATIONS_DIR};
pub use repositories::{
    PgAuthorRepository, PgFlagRepository, PgPollRepository, PgResponseRepository,
    PgStatementRepository,
};
