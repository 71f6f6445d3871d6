//! Opt-out records used as a suppression filter at dispatch time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{delivery::Channel, id::UnsubscribeId};

/// Which channels an unsubscribe entry suppresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsubscribeScope {
    Email,
    Sms,
    Both,
}

impl UnsubscribeScope {
    /// Whether this scope suppresses sends on the given channel.
    #[must_use]
    pub const fn covers(self, channel: Channel) -> bool {
        matches!(
            (self, channel),
            (Self::Both, _) | (Self::Email, Channel::Email) | (Self::Sms, Channel::Sms)
        )
    }
}

/// An opt-out record.
///
/// Entries are never deleted by the dispatch engine; they act purely as a
/// suppression filter during eligibility resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unsubscribe {
    pub id: UnsubscribeId,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub scope: UnsubscribeScope,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Unsubscribe {
    /// Opt an email address out of email sends.
    #[must_use]
    pub fn for_email(email: impl Into<String>) -> Self {
        Self {
            id: UnsubscribeId::generate(),
            email: Some(email.into()),
            phone: None,
            scope: UnsubscribeScope::Email,
            reason: None,
            created_at: Utc::now(),
        }
    }

    /// Opt a phone number out of SMS sends.
    #[must_use]
    pub fn for_phone(phone: impl Into<String>) -> Self {
        Self {
            id: UnsubscribeId::generate(),
            email: None,
            phone: Some(phone.into()),
            scope: UnsubscribeScope::Sms,
            reason: None,
            created_at: Utc::now(),
        }
    }

    /// Widen or narrow the channels this entry suppresses.
    #[must_use]
    pub const fn with_scope(mut self, scope: UnsubscribeScope) -> Self {
        self.scope = scope;
        self
    }

    /// Attach the reason the contact gave for opting out.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Whether this entry suppresses sending to `contact` on `channel`.
    #[must_use]
    pub fn suppresses(&self, channel: Channel, contact: &str) -> bool {
        if !self.scope.covers(channel) {
            return false;
        }

        match channel {
            Channel::Email => self
                .email
                .as_deref()
                .is_some_and(|email| normalize_email(email) == normalize_email(contact)),
            Channel::Sms => self
                .phone
                .as_deref()
                .is_some_and(|phone| normalize_phone(phone) == normalize_phone(contact)),
        }
    }
}

/// Lowercased, trimmed form used for email comparisons.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Digits and any `+` prefix only, so formatting differences do not defeat
/// the opt-out filter.
#[must_use]
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_covers_channels() {
        assert!(UnsubscribeScope::Email.covers(Channel::Email));
        assert!(!UnsubscribeScope::Email.covers(Channel::Sms));
        assert!(UnsubscribeScope::Both.covers(Channel::Email));
        assert!(UnsubscribeScope::Both.covers(Channel::Sms));
    }

    #[test]
    fn email_matching_is_case_insensitive() {
        let entry = Unsubscribe::for_email("Jane@Example.com");
        assert!(entry.suppresses(Channel::Email, "jane@example.com"));
        assert!(entry.suppresses(Channel::Email, "  JANE@EXAMPLE.COM "));
        assert!(!entry.suppresses(Channel::Email, "john@example.com"));
        assert!(!entry.suppresses(Channel::Sms, "jane@example.com"));
    }

    #[test]
    fn phone_matching_ignores_formatting() {
        let entry = Unsubscribe::for_phone("+1 (555) 010-0100");
        assert!(entry.suppresses(Channel::Sms, "+15550100100"));
        assert!(entry.suppresses(Channel::Sms, "+1 555 010 0100"));
        assert!(!entry.suppresses(Channel::Sms, "+15550100101"));
    }

    #[test]
    fn scoped_entry_leaves_other_channel_alone() {
        let entry = Unsubscribe::for_email("jane@example.com").with_scope(UnsubscribeScope::Both);
        assert!(entry.suppresses(Channel::Email, "jane@example.com"));
        // Both-scoped, but no phone on record: sms cannot match
        assert!(!entry.suppresses(Channel::Sms, "+15550100100"));
    }
}
