//! Transport abstraction over email/SMS providers.
//!
//! The orchestrator treats providers as opaque: it hands over a fully
//! rendered message and looks only at success, the provider message id,
//! and the error text. Concrete vendor adapters implement [`Transport`];
//! this crate ships [`mock::MockTransport`] for tests and
//! [`console::ConsoleTransport`] for local runs.

pub mod console;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// A fully rendered email ready for handoff to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    /// HTML body
    pub html_body: String,
    /// Plain-text alternative
    pub text_body: String,
    /// Display name for the From header
    pub from_name: Option<String>,
}

/// A fully rendered SMS ready for handoff to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsMessage {
    pub to: String,
    pub body: String,
}

/// Provider acknowledgement of an accepted message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportReceipt {
    /// Provider-assigned message identifier, when one was returned
    pub message_id: Option<String>,
}

impl TransportReceipt {
    /// A receipt carrying a provider message id.
    #[must_use]
    pub fn with_message_id(message_id: impl Into<String>) -> Self {
        Self {
            message_id: Some(message_id.into()),
        }
    }
}

/// Failure reported by a transport provider.
///
/// The orchestrator records the display form of this error in the delivery
/// log and keeps going; it never inspects the variant.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The provider rejected the message.
    #[error("Rejected by provider: {0}")]
    Rejected(String),

    /// The provider could not be reached.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The call exceeded the configured timeout.
    #[error("Timed out after {0} seconds")]
    Timeout(u64),
}

/// Uniform interface over concrete email/SMS providers.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Hand an email to the provider.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the provider rejects or cannot
    /// accept the message.
    async fn send_email(&self, message: &EmailMessage)
    -> Result<TransportReceipt, TransportError>;

    /// Hand an SMS to the provider.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the provider rejects or cannot
    /// accept the message.
    async fn send_sms(&self, message: &SmsMessage) -> Result<TransportReceipt, TransportError>;
}
