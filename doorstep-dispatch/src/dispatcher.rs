//! Campaign dispatch orchestration.

use std::{sync::Arc, time::Duration};

use doorstep_common::{
    Admin, AttemptRecord, Campaign, CampaignId, Channel, DeliveryLogEntry, MessageType,
    PropertyId, VisitorId,
};
use doorstep_store::{Store, VisitorContext};
use doorstep_template::render;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    eligibility::{self, EligibleVisitor},
    error::DispatchError,
    transport::{EmailMessage, SmsMessage, Transport, TransportError, TransportReceipt},
    variables::build_variables,
};

const fn default_email_timeout() -> u64 {
    30
}

const fn default_sms_timeout() -> u64 {
    30
}

/// Per-call transport timeout configuration.
///
/// A timed-out call is recorded exactly like any other transport failure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TransportTimeouts {
    /// Timeout for a single email handoff
    ///
    /// Default: 30 seconds
    #[serde(default = "default_email_timeout")]
    pub email_secs: u64,

    /// Timeout for a single SMS handoff
    ///
    /// Default: 30 seconds
    #[serde(default = "default_sms_timeout")]
    pub sms_secs: u64,
}

impl Default for TransportTimeouts {
    fn default() -> Self {
        Self {
            email_secs: default_email_timeout(),
            sms_secs: default_sms_timeout(),
        }
    }
}

/// A request to send a campaign now.
#[derive(Debug, Clone)]
pub struct SendRequest {
    pub campaign_id: CampaignId,
    /// Explicit recipient selection; narrows the eligible set, never
    /// widens it
    pub visitor_ids: Option<Vec<VisitorId>>,
    /// Additional property filter, intersected with the campaign's target
    pub property_id: Option<PropertyId>,
    /// Channel override for this run
    pub message_type: Option<MessageType>,
}

impl SendRequest {
    /// Send a campaign to its full eligible set.
    #[must_use]
    pub const fn new(campaign_id: CampaignId) -> Self {
        Self {
            campaign_id,
            visitor_ids: None,
            property_id: None,
            message_type: None,
        }
    }

    /// Restrict the run to these visitors.
    #[must_use]
    pub fn with_visitors(mut self, visitor_ids: Vec<VisitorId>) -> Self {
        self.visitor_ids = Some(visitor_ids);
        self
    }

    /// Restrict the run to visitors of this property.
    #[must_use]
    pub const fn with_property(mut self, property_id: PropertyId) -> Self {
        self.property_id = Some(property_id);
        self
    }

    /// Override the campaign's configured message type for this run.
    #[must_use]
    pub const fn with_message_type(mut self, message_type: MessageType) -> Self {
        self.message_type = Some(message_type);
        self
    }
}

/// One per-recipient failure in a dispatch run.
#[derive(Debug, Clone)]
pub struct DispatchFailure {
    pub visitor_id: VisitorId,
    pub channel: Channel,
    /// The address or number the send was attempted to
    pub recipient: String,
    /// The transport's error text
    pub error: String,
}

/// Aggregated outcome of a dispatch run.
#[derive(Debug, Clone, Default)]
pub struct DispatchSummary {
    /// Messages handed off to the transport successfully
    pub sent: usize,
    /// Messages the transport failed to accept
    pub failed: usize,
    /// Per-recipient failure detail, in dispatch order
    pub failures: Vec<DispatchFailure>,
}

/// A rendered message on its way to one visitor over one channel.
#[derive(Debug)]
struct Rendered {
    channel: Channel,
    recipient: String,
    subject: Option<String>,
    body: String,
}

/// The dispatch orchestrator.
///
/// Resolves eligibility, renders per-visitor templates, invokes the
/// transport under a timeout, and records every attempt in the delivery
/// log. One visitor's transport failure never aborts the rest of the run;
/// the caller gets aggregated counts plus per-failure detail.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    store: Arc<dyn Store>,
    transport: Arc<dyn Transport>,
    timeouts: TransportTimeouts,
}

impl Dispatcher {
    /// Create a dispatcher with default timeouts.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, transport: Arc<dyn Transport>) -> Self {
        Self {
            store,
            transport,
            timeouts: TransportTimeouts::default(),
        }
    }

    /// Override the per-call transport timeouts.
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: TransportTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Send a campaign now.
    ///
    /// Loads the campaign and its owning admin, resolves the eligible
    /// visitor set against a consistent store snapshot, then dispatches
    /// each visitor/channel combination independently. An empty eligible
    /// set is a successful no-op.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::CampaignNotFound`] / [`DispatchError::AdminNotFound`]
    ///   when the campaign or its admin is missing
    /// - [`DispatchError::InvalidConfiguration`] when the campaign lacks
    ///   template content for the effective message type
    /// - [`DispatchError::Store`] when the store fails
    pub async fn send_campaign(
        &self,
        request: SendRequest,
    ) -> Result<DispatchSummary, DispatchError> {
        let campaign = self
            .store
            .campaign(request.campaign_id)
            .await?
            .ok_or(DispatchError::CampaignNotFound(request.campaign_id))?;

        let admin = self
            .store
            .admin(campaign.admin_id)
            .await?
            .ok_or(DispatchError::AdminNotFound(campaign.admin_id))?;

        let message_type = request.message_type.unwrap_or(campaign.message_type);
        campaign.validate_content(message_type)?;

        let view = self.store.campaign_view(campaign.id).await?;
        let eligible = eligibility::resolve(
            &campaign,
            message_type,
            &view,
            request.property_id,
            request.visitor_ids.as_deref(),
        );

        if eligible.is_empty() {
            debug!(campaign = %campaign.id, "no eligible visitors, nothing to send");
            return Ok(DispatchSummary::default());
        }

        info!(
            campaign = %campaign.id,
            eligible = eligible.len(),
            message_type = %message_type,
            "dispatching campaign"
        );

        let mut summary = DispatchSummary::default();
        for visitor in &eligible {
            self.dispatch_to_visitor(&campaign, &admin, visitor, &mut summary)
                .await;
        }

        info!(
            campaign = %campaign.id,
            sent = summary.sent,
            failed = summary.failed,
            "dispatch complete"
        );
        Ok(summary)
    }

    /// Dispatch every open channel for one visitor.
    ///
    /// Channel rules: a channel is attempted only when it survived opt-out
    /// suppression, the visitor has a usable address for it, and the
    /// campaign carries content for it. A channel skipped for a missing
    /// address contributes neither a sent nor a failed count.
    async fn dispatch_to_visitor(
        &self,
        campaign: &Campaign,
        admin: &Admin,
        eligible: &EligibleVisitor,
        summary: &mut DispatchSummary,
    ) {
        let context = &eligible.context;
        let vars = build_variables(context, admin);

        if eligible.channels.email {
            match usable_contact(context.visitor.email.as_deref()) {
                Some(email) => {
                    let rendered = Rendered {
                        channel: Channel::Email,
                        recipient: email,
                        subject: Some(render(
                            campaign.email_subject.as_deref().unwrap_or_default(),
                            &vars,
                        )),
                        body: render(campaign.email_body.as_deref().unwrap_or_default(), &vars),
                    };
                    let outcome = self.send_email(campaign, &rendered).await;
                    self.record_outcome(campaign, context, rendered, outcome, summary)
                        .await;
                }
                None => {
                    debug!(
                        visitor = %context.visitor.id,
                        "visitor has no email address, skipping email channel"
                    );
                }
            }
        }

        if eligible.channels.sms {
            let template = campaign.sms_body.as_deref().unwrap_or_default();
            if template.trim().is_empty() {
                debug!(
                    campaign = %campaign.id,
                    "campaign has no sms template, skipping sms channel"
                );
            } else {
                match usable_contact(context.visitor.phone.as_deref()) {
                    Some(phone) => {
                        let rendered = Rendered {
                            channel: Channel::Sms,
                            recipient: phone,
                            subject: None,
                            body: render(template, &vars),
                        };
                        let outcome = self.send_sms(&rendered).await;
                        self.record_outcome(campaign, context, rendered, outcome, summary)
                            .await;
                    }
                    None => {
                        debug!(
                            visitor = %context.visitor.id,
                            "visitor has no phone number, skipping sms channel"
                        );
                    }
                }
            }
        }
    }

    async fn send_email(
        &self,
        campaign: &Campaign,
        rendered: &Rendered,
    ) -> Result<TransportReceipt, TransportError> {
        let subject = rendered.subject.clone().unwrap_or_default();
        let message = EmailMessage {
            to: rendered.recipient.clone(),
            subject,
            html_body: rendered.body.clone(),
            text_body: rendered.body.clone(),
            from_name: campaign.from_name.clone(),
        };

        let secs = self.timeouts.email_secs;
        match tokio::time::timeout(
            Duration::from_secs(secs),
            self.transport.send_email(&message),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(TransportError::Timeout(secs)),
        }
    }

    async fn send_sms(&self, rendered: &Rendered) -> Result<TransportReceipt, TransportError> {
        let message = SmsMessage {
            to: rendered.recipient.clone(),
            body: rendered.body.clone(),
        };

        let secs = self.timeouts.sms_secs;
        match tokio::time::timeout(Duration::from_secs(secs), self.transport.send_sms(&message))
            .await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(TransportError::Timeout(secs)),
        }
    }

    /// Write the delivery-log entry for one attempt and update the
    /// summary.
    ///
    /// A duplicate-delivery rejection from the store means a concurrent
    /// run already recorded a successful send for this combination; the
    /// attempt is treated as suppressed and counts nothing.
    async fn record_outcome(
        &self,
        campaign: &Campaign,
        context: &VisitorContext,
        rendered: Rendered,
        outcome: Result<TransportReceipt, TransportError>,
        summary: &mut DispatchSummary,
    ) {
        let channel = rendered.channel;
        let recipient = rendered.recipient.clone();
        let attempt = AttemptRecord {
            visitor_id: context.visitor.id,
            campaign_id: campaign.id,
            property_id: context.visitor.property_id,
            channel,
            recipient: rendered.recipient,
            subject: rendered.subject,
            body: rendered.body,
        };

        let entry = match &outcome {
            Ok(receipt) => DeliveryLogEntry::sent(attempt, receipt.message_id.clone()),
            Err(error) => DeliveryLogEntry::failed(attempt, error.to_string()),
        };

        match self.store.record_delivery(entry).await {
            Ok(_) => {}
            Err(error) if error.is_duplicate_delivery() => {
                warn!(
                    visitor = %context.visitor.id,
                    %channel,
                    "delivery already recorded by a concurrent run, suppressing"
                );
                return;
            }
            Err(error) => {
                warn!(
                    visitor = %context.visitor.id,
                    %channel,
                    %error,
                    "failed to record delivery log entry"
                );
            }
        }

        match outcome {
            Ok(_) => summary.sent += 1,
            Err(error) => {
                summary.failed += 1;
                summary.failures.push(DispatchFailure {
                    visitor_id: context.visitor.id,
                    channel,
                    recipient,
                    error: error.to_string(),
                });
            }
        }
    }
}

fn usable_contact(contact: Option<&str>) -> Option<String> {
    contact
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
