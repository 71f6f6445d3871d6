//! Visitor records created at open-house check-in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    delivery::Channel,
    id::{PropertyId, VisitorId},
};

/// A visitor who checked in at an open house.
///
/// Created once at check-in and immutable afterwards. Interest and
/// has-feedback flags are derived from the associated
/// [`Feedback`](crate::Feedback) record rather than stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visitor {
    pub id: VisitorId,
    pub name: String,
    /// Contact email, if the visitor provided one
    pub email: Option<String>,
    /// Contact phone number, if the visitor provided one
    pub phone: Option<String>,
    /// The property the visitor checked in at, if any
    pub property_id: Option<PropertyId>,
    /// When the visitor checked in
    pub visited_at: DateTime<Utc>,
}

impl Visitor {
    /// Create a new visitor record at check-in time.
    #[must_use]
    pub fn check_in(name: impl Into<String>, property_id: Option<PropertyId>) -> Self {
        Self {
            id: VisitorId::generate(),
            name: name.into(),
            email: None,
            phone: None,
            property_id,
            visited_at: Utc::now(),
        }
    }

    /// Attach a contact email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Attach a contact phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Whether this visitor has a usable address for the given channel.
    ///
    /// A missing or blank address means the channel is silently skipped at
    /// dispatch time; it is not an error.
    #[must_use]
    pub fn has_contact_for(&self, channel: Channel) -> bool {
        let contact = match channel {
            Channel::Email => self.email.as_deref(),
            Channel::Sms => self.phone.as_deref(),
        };
        contact.is_some_and(|value| !value.trim().is_empty())
    }
}
