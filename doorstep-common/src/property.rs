//! Listed properties that visitors check in at.

use serde::{Deserialize, Serialize};

use crate::id::{AdminId, PropertyId};

/// Lifecycle status of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    #[default]
    Active,
    Inactive,
    Sold,
}

impl std::fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Sold => "sold",
        };
        write!(f, "{label}")
    }
}

/// A property listing owned by an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    /// Display name used in message templates, e.g. "Maple House"
    pub name: String,
    pub address: String,
    /// The admin who owns this listing
    pub admin_id: AdminId,
    pub status: PropertyStatus,
}

impl Property {
    /// Create a new active listing.
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>, admin_id: AdminId) -> Self {
        Self {
            id: PropertyId::generate(),
            name: name.into(),
            address: address.into(),
            admin_id,
            status: PropertyStatus::Active,
        }
    }
}
