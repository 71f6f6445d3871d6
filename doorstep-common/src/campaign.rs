//! Follow-up campaign configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::{AdminId, CampaignId, PropertyId};

/// Error returned when parsing an unrecognized enum value from user input.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

/// Which channels a campaign sends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Email,
    Sms,
    Both,
}

impl MessageType {
    /// Whether this message type sends on the email channel.
    #[must_use]
    pub const fn includes_email(self) -> bool {
        matches!(self, Self::Email | Self::Both)
    }

    /// Whether this message type sends on the SMS channel.
    #[must_use]
    pub const fn includes_sms(self) -> bool {
        matches!(self, Self::Sms | Self::Both)
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Email => "email",
            Self::Sms => "sms",
            Self::Both => "both",
        };
        write!(f, "{label}")
    }
}

impl std::str::FromStr for MessageType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "sms" => Ok(Self::Sms),
            "both" => Ok(Self::Both),
            other => Err(ParseEnumError {
                kind: "message type",
                value: other.to_string(),
            }),
        }
    }
}

/// The rule selecting which visitors qualify for a campaign run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCondition {
    /// Visitors whose feedback marks them interested
    Interested,
    /// Every visitor in scope
    All,
    /// Visitors who left no feedback
    NoFeedback,
    /// Recipients are selected explicitly by the operator; property scoping
    /// still applies
    Manual,
}

impl std::fmt::Display for TriggerCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Interested => "interested",
            Self::All => "all",
            Self::NoFeedback => "no_feedback",
            Self::Manual => "manual",
        };
        write!(f, "{label}")
    }
}

impl std::str::FromStr for TriggerCondition {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "interested" => Ok(Self::Interested),
            "all" => Ok(Self::All),
            "no_feedback" => Ok(Self::NoFeedback),
            "manual" => Ok(Self::Manual),
            other => Err(ParseEnumError {
                kind: "trigger condition",
                value: other.to_string(),
            }),
        }
    }
}

/// Dashboard lifecycle state of a campaign.
///
/// Informational only: an explicit send of a paused campaign is honoured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    #[default]
    Active,
    Paused,
    Completed,
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        };
        write!(f, "{label}")
    }
}

/// Missing template content for a campaign's channels.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("email campaigns require a non-empty subject")]
    MissingEmailSubject,

    #[error("email campaigns require a non-empty body template")]
    MissingEmailBody,

    #[error("sms campaigns require a non-empty body template")]
    MissingSmsBody,
}

/// A configured follow-up campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    /// Target property; `None` targets visitors of all properties
    pub property_id: Option<PropertyId>,
    /// The admin who owns this campaign and its delivery log
    pub admin_id: AdminId,
    pub message_type: MessageType,
    pub trigger_condition: TriggerCondition,
    /// Informational only: no scheduler honours this field, sends are
    /// always explicit
    pub delay_hours: u32,
    pub email_subject: Option<String>,
    pub email_body: Option<String>,
    /// Display name for the email From header
    pub from_name: Option<String>,
    pub sms_body: Option<String>,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
}

impl Campaign {
    /// Create a campaign with the given targeting rules and no content.
    ///
    /// Content is attached with the builder methods and checked by
    /// [`validate_content`](Self::validate_content) before the campaign is
    /// activated or sent.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        admin_id: AdminId,
        message_type: MessageType,
        trigger_condition: TriggerCondition,
    ) -> Self {
        Self {
            id: CampaignId::generate(),
            name: name.into(),
            property_id: None,
            admin_id,
            message_type,
            trigger_condition,
            delay_hours: 0,
            email_subject: None,
            email_body: None,
            from_name: None,
            sms_body: None,
            status: CampaignStatus::Active,
            created_at: Utc::now(),
        }
    }

    /// Target a single property.
    #[must_use]
    pub const fn for_property(mut self, property_id: PropertyId) -> Self {
        self.property_id = Some(property_id);
        self
    }

    /// Attach email subject and body templates.
    #[must_use]
    pub fn with_email(mut self, subject: impl Into<String>, body: impl Into<String>) -> Self {
        self.email_subject = Some(subject.into());
        self.email_body = Some(body.into());
        self
    }

    /// Attach an SMS body template.
    #[must_use]
    pub fn with_sms(mut self, body: impl Into<String>) -> Self {
        self.sms_body = Some(body.into());
        self
    }

    /// Set the From display name for email sends.
    #[must_use]
    pub fn with_from_name(mut self, from_name: impl Into<String>) -> Self {
        self.from_name = Some(from_name.into());
        self
    }

    /// Check that the templates required by `message_type` are present and
    /// non-empty.
    ///
    /// Called with the campaign's own message type at save time, and with
    /// the effective (possibly overridden) type before a dispatch run.
    ///
    /// # Errors
    ///
    /// Returns the first missing piece of content.
    pub fn validate_content(&self, message_type: MessageType) -> Result<(), ContentError> {
        if message_type.includes_email() {
            if is_blank(self.email_subject.as_deref()) {
                return Err(ContentError::MissingEmailSubject);
            }
            if is_blank(self.email_body.as_deref()) {
                return Err(ContentError::MissingEmailBody);
            }
        }

        if message_type.includes_sms() && is_blank(self.sms_body.as_deref()) {
            return Err(ContentError::MissingSmsBody);
        }

        Ok(())
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|text| text.trim().is_empty())
}
