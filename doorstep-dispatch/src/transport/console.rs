//! Transport that logs messages instead of delivering them.

use async_trait::async_trait;
use tracing::info;

use super::{EmailMessage, SmsMessage, Transport, TransportError, TransportReceipt};

/// A [`Transport`] for local runs and demos: every message is logged and
/// reported as accepted, nothing leaves the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleTransport;

#[async_trait]
impl Transport for ConsoleTransport {
    async fn send_email(
        &self,
        message: &EmailMessage,
    ) -> Result<TransportReceipt, TransportError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            from_name = message.from_name.as_deref().unwrap_or(""),
            "email dispatched (console transport)"
        );
        Ok(TransportReceipt::default())
    }

    async fn send_sms(&self, message: &SmsMessage) -> Result<TransportReceipt, TransportError> {
        info!(to = %message.to, body = %message.body, "sms dispatched (console transport)");
        Ok(TransportReceipt::default())
    }
}
