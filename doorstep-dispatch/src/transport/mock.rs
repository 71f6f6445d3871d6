//! Programmable in-memory transport for tests.

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{EmailMessage, SmsMessage, Transport, TransportError, TransportReceipt};

#[derive(Debug, Default)]
struct MockState {
    sent_emails: Vec<EmailMessage>,
    sent_sms: Vec<SmsMessage>,
    /// Recipients whose sends fail, with the error text to report
    failures: HashMap<String, String>,
    /// Artificial latency applied to every send
    delay: Option<Duration>,
    counter: u64,
}

/// Mock [`Transport`] that records every message and can be programmed to
/// fail or stall per recipient.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Create a new mock transport where every send succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send to `recipient` fail with the given error text.
    pub fn fail_for(&self, recipient: impl Into<String>, error: impl Into<String>) {
        self.state
            .lock()
            .failures
            .insert(recipient.into(), error.into());
    }

    /// Let sends to `recipient` succeed again.
    pub fn clear_failure(&self, recipient: &str) {
        self.state.lock().failures.remove(recipient);
    }

    /// Apply an artificial delay to every send, for timeout tests.
    pub fn set_delay(&self, delay: Duration) {
        self.state.lock().delay = Some(delay);
    }

    /// Emails handed to the transport, in send order.
    #[must_use]
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.state.lock().sent_emails.clone()
    }

    /// SMS messages handed to the transport, in send order.
    #[must_use]
    pub fn sent_sms(&self) -> Vec<SmsMessage> {
        self.state.lock().sent_sms.clone()
    }

    /// Number of emails handed to the transport.
    #[must_use]
    pub fn email_count(&self) -> usize {
        self.state.lock().sent_emails.len()
    }

    /// Number of SMS messages handed to the transport.
    #[must_use]
    pub fn sms_count(&self) -> usize {
        self.state.lock().sent_sms.len()
    }

    async fn apply_delay(&self) {
        let delay = self.state.lock().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn outcome_for(&self, recipient: &str) -> Result<TransportReceipt, TransportError> {
        let mut state = self.state.lock();
        if let Some(error) = state.failures.get(recipient) {
            return Err(TransportError::Rejected(error.clone()));
        }
        state.counter += 1;
        Ok(TransportReceipt::with_message_id(format!(
            "mock-{}",
            state.counter
        )))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_email(
        &self,
        message: &EmailMessage,
    ) -> Result<TransportReceipt, TransportError> {
        self.apply_delay().await;
        let outcome = self.outcome_for(&message.to);
        if outcome.is_ok() {
            self.state.lock().sent_emails.push(message.clone());
        }
        outcome
    }

    async fn send_sms(&self, message: &SmsMessage) -> Result<TransportReceipt, TransportError> {
        self.apply_delay().await;
        let outcome = self.outcome_for(&message.to);
        if outcome.is_ok() {
            self.state.lock().sent_sms.push(message.clone());
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_sends_and_assigns_message_ids() {
        let transport = MockTransport::new();
        let receipt = transport
            .send_sms(&SmsMessage {
                to: "+15550100100".to_string(),
                body: "Hi".to_string(),
            })
            .await
            .unwrap();

        assert!(receipt.message_id.is_some());
        assert_eq!(transport.sms_count(), 1);
    }

    #[tokio::test]
    async fn programmed_failures_are_reported_and_not_recorded() {
        let transport = MockTransport::new();
        transport.fail_for("jane@example.com", "mailbox full");

        let outcome = transport
            .send_email(&EmailMessage {
                to: "jane@example.com".to_string(),
                subject: "Hello".to_string(),
                html_body: "Hi".to_string(),
                text_body: "Hi".to_string(),
                from_name: None,
            })
            .await;

        assert!(matches!(outcome, Err(TransportError::Rejected(text)) if text == "mailbox full"));
        assert_eq!(transport.email_count(), 0);

        transport.clear_failure("jane@example.com");
        assert!(
            transport
                .send_email(&EmailMessage {
                    to: "jane@example.com".to_string(),
                    subject: "Hello".to_string(),
                    html_body: "Hi".to_string(),
                    text_body: "Hi".to_string(),
                    from_name: None,
                })
                .await
                .is_ok()
        );
    }
}
