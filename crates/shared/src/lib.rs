//! Shared utilities and common types for the donation platform backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Field validation (phone, currency, slug, tax id, amounts)
//! - Money formatting helpers

pub mod money;
pub mod validation;
