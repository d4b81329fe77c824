//! HTTP route handlers.

pub mod campaigns;
pub mod donations;
pub mod health;
pub mod messages;
pub mod settings;
