//! Domain layer for the donation platform backend.
//!
//! This crate contains:
//! - Domain models (campaigns, donations, messages, settings) and lifecycle enums
//! - Message template processing
//! - Provider abstractions for payments, payouts and messaging

pub mod models;
pub mod services;
