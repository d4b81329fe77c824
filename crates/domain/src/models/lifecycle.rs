//! Record lifecycle shared by every persisted entity.

use serde::{Deserialize, Serialize};

/// Lifecycle of a persisted record.
///
/// `Active` and `Inactive` can move back and forth; `Deleted` is terminal
/// (soft delete, the row stays in the table).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum EntityStatus {
    #[default]
    Active,
    Inactive,
    Deleted,
}

impl EntityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityStatus::Active => "active",
            EntityStatus::Inactive => "inactive",
            EntityStatus::Deleted => "deleted",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, EntityStatus::Active)
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, EntityStatus::Deleted)
    }

    /// Whether a record in this state is returned by a read with the given
    /// `include_inactive` flag. Deleted records are never visible.
    pub fn is_visible(&self, include_inactive: bool) -> bool {
        match self {
            EntityStatus::Active => true,
            EntityStatus::Inactive => include_inactive,
            EntityStatus::Deleted => false,
        }
    }
}

impl std::fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
