//! Delivery log records: one row per send attempt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{CampaignId, DeliveryLogId, PropertyId, VisitorId};

/// Channel a message was dispatched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Email => "email",
            Self::Sms => "sms",
        };
        write!(f, "{label}")
    }
}

/// Lifecycle status of a delivery-log entry.
///
/// The dispatch engine only ever writes `Sent` or `Failed`; the remaining
/// states are written later by provider status webhooks feeding the same
/// store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    Sent,
    Delivered,
    Failed,
    Bounced,
    Opened,
    Clicked,
}

impl DeliveryStatus {
    /// Whether an entry with this status suppresses another send of the
    /// same campaign to the same visitor.
    ///
    /// Every status except `Failed` does: a failed attempt is the one case
    /// that may be retried by a later run.
    #[must_use]
    pub const fn suppresses_resend(self) -> bool {
        !matches!(self, Self::Failed)
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
            Self::Bounced => "bounced",
            Self::Opened => "opened",
            Self::Clicked => "clicked",
        };
        write!(f, "{label}")
    }
}

/// A single row in the append-only delivery log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryLogEntry {
    pub id: DeliveryLogId,
    pub visitor_id: VisitorId,
    pub campaign_id: CampaignId,
    pub property_id: Option<PropertyId>,
    pub channel: Channel,
    /// The email address or phone number the message went to
    pub recipient: String,
    /// Rendered subject (email only)
    pub subject: Option<String>,
    /// Rendered message body
    pub body: String,
    pub status: DeliveryStatus,
    /// Provider-assigned message identifier, when the transport returned one
    pub provider_message_id: Option<String>,
    /// Transport error detail for failed attempts
    pub error: Option<String>,
    pub sent_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub opened_at: Option<DateTime<Utc>>,
    pub clicked_at: Option<DateTime<Utc>>,
}

/// The identifying fields of an attempt, shared by both constructors.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    pub visitor_id: VisitorId,
    pub campaign_id: CampaignId,
    pub property_id: Option<PropertyId>,
    pub channel: Channel,
    pub recipient: String,
    pub subject: Option<String>,
    pub body: String,
}

impl DeliveryLogEntry {
    fn from_attempt(attempt: AttemptRecord, status: DeliveryStatus) -> Self {
        Self {
            id: DeliveryLogId::generate(),
            visitor_id: attempt.visitor_id,
            campaign_id: attempt.campaign_id,
            property_id: attempt.property_id,
            channel: attempt.channel,
            recipient: attempt.recipient,
            subject: attempt.subject,
            body: attempt.body,
            status,
            provider_message_id: None,
            error: None,
            sent_at: Utc::now(),
            delivered_at: None,
            opened_at: None,
            clicked_at: None,
        }
    }

    /// Record a successful handoff to the transport.
    #[must_use]
    pub fn sent(attempt: AttemptRecord, provider_message_id: Option<String>) -> Self {
        let mut entry = Self::from_attempt(attempt, DeliveryStatus::Sent);
        entry.provider_message_id = provider_message_id;
        entry
    }

    /// Record a failed send attempt with the transport's error text.
    #[must_use]
    pub fn failed(attempt: AttemptRecord, error: impl Into<String>) -> Self {
        let mut entry = Self::from_attempt(attempt, DeliveryStatus::Failed);
        entry.error = Some(error.into());
        entry
    }
}
