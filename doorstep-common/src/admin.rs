//! Admin (agent) accounts that own properties and campaigns.

use serde::{Deserialize, Serialize};

use crate::id::AdminId;

/// An admin account.
///
/// Campaigns resolve their `admin_name`/`admin_email`/`admin_phone` template
/// variables from the owning admin; a campaign whose admin cannot be loaded
/// is unsendable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    pub id: AdminId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl Admin {
    /// Create a new admin account.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: AdminId::generate(),
            name: name.into(),
            email: email.into(),
            phone: None,
        }
    }

    /// Attach a contact phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}
