//! The persistence interface consumed by the dispatch engine.

use async_trait::async_trait;
use doorstep_common::{
    Admin, AdminId, Campaign, CampaignId, DeliveryLogEntry, DeliveryLogId, Feedback, Property,
    PropertyId, Unsubscribe, Visitor, VisitorId,
};

use crate::{
    error::Result,
    view::{CampaignStats, CampaignView},
};

/// Abstraction over the relational store backing Doorstep.
///
/// Implementations must uphold two contracts the dispatch engine depends
/// on:
///
/// - [`record_delivery`](Store::record_delivery) must reject a second entry
///   with a non-failed status for the same (campaign, visitor, channel),
///   even under concurrent writers. This check-then-write discipline is
///   what makes re-sending a campaign safe.
/// - [`campaign_view`](Store::campaign_view) must capture its whole
///   snapshot in one logical read, so eligibility resolution and dispatch
///   within a run never observe two different states.
#[async_trait]
pub trait Store: Send + Sync + std::fmt::Debug {
    /// Insert an admin account.
    async fn insert_admin(&self, admin: Admin) -> Result<()>;

    /// Look up an admin by id.
    async fn admin(&self, id: AdminId) -> Result<Option<Admin>>;

    /// Insert a property listing.
    async fn insert_property(&self, property: Property) -> Result<()>;

    /// Look up a property by id.
    async fn property(&self, id: PropertyId) -> Result<Option<Property>>;

    /// Record a visitor check-in.
    async fn check_in(&self, visitor: Visitor) -> Result<()>;

    /// Look up a visitor by id.
    async fn visitor(&self, id: VisitorId) -> Result<Option<Visitor>>;

    /// Attach feedback to a visitor.
    ///
    /// # Errors
    ///
    /// [`StoreError::VisitorNotFound`](crate::StoreError::VisitorNotFound)
    /// if the visitor does not exist,
    /// [`StoreError::FeedbackExists`](crate::StoreError::FeedbackExists) if
    /// feedback was already recorded for them.
    async fn attach_feedback(&self, feedback: Feedback) -> Result<()>;

    /// Look up the feedback left by a visitor, if any.
    async fn feedback_for(&self, visitor_id: VisitorId) -> Result<Option<Feedback>>;

    /// Insert or replace a campaign.
    async fn save_campaign(&self, campaign: Campaign) -> Result<()>;

    /// Look up a campaign by id.
    async fn campaign(&self, id: CampaignId) -> Result<Option<Campaign>>;

    /// Record an opt-out entry.
    async fn record_unsubscribe(&self, entry: Unsubscribe) -> Result<()>;

    /// Append an entry to the delivery log.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuplicateDelivery`](crate::StoreError::DuplicateDelivery)
    /// when the entry has a non-failed status and a non-failed entry for
    /// the same (campaign, visitor, channel) already exists.
    async fn record_delivery(&self, entry: DeliveryLogEntry) -> Result<DeliveryLogId>;

    /// All delivery-log entries for a campaign, oldest first.
    async fn deliveries_for_campaign(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Vec<DeliveryLogEntry>>;

    /// All delivery-log entries for a visitor, oldest first.
    async fn deliveries_for_visitor(&self, visitor_id: VisitorId)
    -> Result<Vec<DeliveryLogEntry>>;

    /// The most recent delivery-log entries, newest first, up to `limit`.
    async fn recent_deliveries(&self, limit: usize) -> Result<Vec<DeliveryLogEntry>>;

    /// Aggregate delivery counts for a campaign.
    async fn campaign_stats(&self, campaign_id: CampaignId) -> Result<CampaignStats>;

    /// The eligibility read: all visitors joined with property and
    /// feedback, the opt-out list, and the campaign's delivery history,
    /// captured as one consistent snapshot.
    ///
    /// This is the one non-trivial query the engine issues; everything
    /// else is a point read or an append.
    async fn campaign_view(&self, campaign_id: CampaignId) -> Result<CampaignView>;
}
