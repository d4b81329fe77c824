//! Repository implementations for database operations.
//!
//! Every entity gets a [`Repository`] alias; lookups specific to one entity
//! live in an inherent `impl` next to its alias.

pub mod campaign;
pub mod donation;
pub mod generic;
pub mod message;
pub mod payout;
pub mod profile;
pub mod setting;
pub mod user;
pub mod w9_form;

pub use campaign::CampaignRepository;
pub use donation::DonationRepository;
pub use generic::Repository;
pub use message::MessageRepository;
pub use payout::PayoutRepository;
pub use profile::ProfileRepository;
pub use setting::SettingRepository;
pub use user::UserRepository;
pub use w9_form::W9FormRepository;
