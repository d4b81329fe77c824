//! Custom Axum extractors.

pub mod actor;

pub use actor::{Actor, ACTOR_HEADER, DEFAULT_ACTOR};
