//! Eligibility resolution for campaign runs.

use std::collections::HashSet;

use doorstep_common::{
    Campaign, Channel, MessageType, PropertyId, TriggerCondition, Unsubscribe, VisitorId,
};
use doorstep_store::{CampaignView, VisitorContext};

/// Which of the run's channels remain open for a visitor after opt-out
/// suppression.
///
/// Channels outside the effective message type are always `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelEligibility {
    pub email: bool,
    pub sms: bool,
}

impl ChannelEligibility {
    /// Whether any channel remains open.
    #[must_use]
    pub const fn any(self) -> bool {
        self.email || self.sms
    }
}

/// One visitor selected for a campaign run.
#[derive(Debug, Clone)]
pub struct EligibleVisitor {
    pub context: VisitorContext,
    pub channels: ChannelEligibility,
}

/// Determine exactly which visitors a campaign run should target.
///
/// Rules are applied in order over the consistent `view` snapshot:
///
/// 1. Property scoping: the campaign's target property intersected with
///    the explicit `property_filter` (conflicting filters select nothing).
/// 2. The trigger-condition predicate (`all` and `manual` select
///    everything in scope).
/// 3. Opt-out suppression per channel of `message_type`; a visitor with
///    every requested channel suppressed drops out entirely.
/// 4. Duplicate-send suppression: any non-failed delivery-log entry for
///    this campaign removes the visitor. Prior failed attempts do not.
/// 5. Intersection with `explicit_visitors`; explicit selection narrows,
///    never widens.
///
/// The result is ordered by ascending visitor id. ULIDs sort by creation
/// time, so the order is deterministic and stable across repeated calls on
/// unchanged data.
#[must_use]
pub fn resolve(
    campaign: &Campaign,
    message_type: MessageType,
    view: &CampaignView,
    property_filter: Option<PropertyId>,
    explicit_visitors: Option<&[VisitorId]>,
) -> Vec<EligibleVisitor> {
    let explicit: Option<HashSet<VisitorId>> =
        explicit_visitors.map(|ids| ids.iter().copied().collect());

    // Visitors with any non-failed entry for this campaign are done
    let already_sent: HashSet<VisitorId> = view
        .deliveries
        .iter()
        .filter(|entry| entry.status.suppresses_resend())
        .map(|entry| entry.visitor_id)
        .collect();

    let mut eligible: Vec<EligibleVisitor> = view
        .visitors
        .iter()
        .filter(|context| in_property_scope(context, campaign.property_id, property_filter))
        .filter(|context| matches_trigger(context, campaign.trigger_condition))
        .filter(|context| !already_sent.contains(&context.visitor.id))
        .filter(|context| {
            explicit
                .as_ref()
                .is_none_or(|ids| ids.contains(&context.visitor.id))
        })
        .filter_map(|context| {
            let channels = channel_eligibility(context, message_type, &view.unsubscribes);
            channels.any().then(|| EligibleVisitor {
                context: context.clone(),
                channels,
            })
        })
        .collect();

    eligible.sort_by_key(|selected| selected.context.visitor.id);
    eligible
}

fn in_property_scope(
    context: &VisitorContext,
    target: Option<PropertyId>,
    filter: Option<PropertyId>,
) -> bool {
    let in_scope =
        |wanted: Option<PropertyId>| wanted.is_none_or(|id| context.visitor.property_id == Some(id));

    in_scope(target) && in_scope(filter)
}

fn matches_trigger(context: &VisitorContext, trigger: TriggerCondition) -> bool {
    match trigger {
        TriggerCondition::All | TriggerCondition::Manual => true,
        TriggerCondition::Interested => context.interested(),
        TriggerCondition::NoFeedback => !context.has_feedback(),
    }
}

fn channel_eligibility(
    context: &VisitorContext,
    message_type: MessageType,
    unsubscribes: &[Unsubscribe],
) -> ChannelEligibility {
    let suppressed = |channel: Channel, contact: Option<&str>| {
        contact.is_some_and(|contact| {
            unsubscribes
                .iter()
                .any(|entry| entry.suppresses(channel, contact))
        })
    };

    ChannelEligibility {
        email: message_type.includes_email()
            && !suppressed(Channel::Email, context.visitor.email.as_deref()),
        sms: message_type.includes_sms()
            && !suppressed(Channel::Sms, context.visitor.phone.as_deref()),
    }
}
