//! Database entity definitions.
//!
//! Entities are direct mappings to database rows. Each module also owns the
//! DDL for its table (see [`crate::schema`]).

/// Column definitions for the audit contract, spliced into every `CREATE TABLE`.
macro_rules! audit_columns {
    () => {
        "id INTEGER PRIMARY KEY AUTOINCREMENT, \
         status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'inactive', 'deleted')), \
         created_on TEXT NOT NULL, \
         created_by TEXT NOT NULL, \
         modified_on TEXT, \
         modified_by TEXT, "
    };
}

pub mod audit;
pub mod campaign;
pub mod donation;
pub mod message;
pub mod payout;
pub mod profile;
pub mod setting;
pub mod user;
pub mod w9_form;

pub use audit::{Audit, Entity, SqliteQueryAs, AUDIT_COLUMNS};
pub use campaign::CampaignEntity;
pub use donation::{next_monthly_charge, DonationEntity};
pub use message::MessageEntity;
pub use payout::PayoutEntity;
pub use profile::ProfileEntity;
pub use setting::SettingEntity;
pub use user::UserEntity;
pub use w9_form::W9FormEntity;
