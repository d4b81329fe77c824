//! Profile models. Donors and fundraisers are both profiles of a user.

use serde::{Deserialize, Serialize};

/// Role a profile plays on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ProfileType {
    Donor,
    Fundraiser,
}

impl std::fmt::Display for ProfileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileType::Donor => write!(f, "donor"),
            ProfileType::Fundraiser => write!(f, "fundraiser"),
        }
    }
}
