//! Snapshot types produced by the eligibility read.

use doorstep_common::{DeliveryLogEntry, Feedback, Property, Unsubscribe, Visitor};

/// A visitor joined with its property and feedback rows.
#[derive(Debug, Clone)]
pub struct VisitorContext {
    pub visitor: Visitor,
    pub property: Option<Property>,
    pub feedback: Option<Feedback>,
}

impl VisitorContext {
    /// Whether the visitor's feedback marks them interested.
    #[must_use]
    pub fn interested(&self) -> bool {
        self.feedback.as_ref().is_some_and(|feedback| feedback.interested)
    }

    /// Whether the visitor has left feedback at all.
    #[must_use]
    pub const fn has_feedback(&self) -> bool {
        self.feedback.is_some()
    }
}

/// Everything eligibility resolution needs for one campaign run, captured
/// in a single logical read so the whole run observes one consistent state.
#[derive(Debug, Clone)]
pub struct CampaignView {
    /// All visitors joined with their property and feedback, in creation
    /// order (ascending visitor id)
    pub visitors: Vec<VisitorContext>,
    /// Every opt-out entry on record
    pub unsubscribes: Vec<Unsubscribe>,
    /// The campaign's full delivery history
    pub deliveries: Vec<DeliveryLogEntry>,
}

/// Per-campaign delivery counts for the analytics dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CampaignStats {
    /// Entries that reached the transport (every non-failed, non-pending
    /// status, including webhook-written ones like `delivered` or `opened`)
    pub sent: usize,
    /// Failed attempts
    pub failed: usize,
    /// All entries, regardless of status
    pub total: usize,
}
