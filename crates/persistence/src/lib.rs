//! Persistence layer for the donation platform backend.
//!
//! This crate contains:
//! - Database connection management and schema registration
//! - Entity definitions (database row mappings) with the audit contract
//! - The read cache abstraction and its in-memory backend
//! - The generic repository and per-entity lookups
//! - Query metrics

pub mod cache;
pub mod db;
pub mod entities;
pub mod error;
pub mod metrics;
pub mod query;
pub mod repositories;
pub mod schema;

pub use error::{RepositoryError, RepositoryResult};
