//! In-memory reference backend.

use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Arc,
};

use async_trait::async_trait;
use doorstep_common::{
    Admin, AdminId, Campaign, CampaignId, DeliveryLogEntry, DeliveryLogId, DeliveryStatus,
    Feedback, Property, PropertyId, Unsubscribe, Visitor, VisitorId,
};
use parking_lot::RwLock;
use tracing::debug;

use crate::{
    error::{Result, StoreError},
    store::Store,
    view::{CampaignStats, CampaignView, VisitorContext},
};

#[derive(Debug, Default)]
struct Inner {
    admins: HashMap<AdminId, Admin>,
    properties: HashMap<PropertyId, Property>,
    visitors: HashMap<VisitorId, Visitor>,
    /// Keyed by visitor: the one-feedback-per-visitor constraint
    feedback: HashMap<VisitorId, Feedback>,
    campaigns: HashMap<CampaignId, Campaign>,
    unsubscribes: Vec<Unsubscribe>,
    /// Append-only, in write order
    deliveries: Vec<DeliveryLogEntry>,
}

/// In-memory [`Store`] implementation.
///
/// A single `RwLock` guards all tables: `campaign_view` reads everything
/// under one read guard (a consistent snapshot), and `record_delivery`
/// checks for duplicates and appends under one write guard (the
/// serialization point for duplicate suppression).
///
/// Cloning is cheap and shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of visitors checked in.
    #[must_use]
    pub fn visitor_count(&self) -> usize {
        self.inner.read().visitors.len()
    }

    /// Number of delivery-log entries recorded.
    #[must_use]
    pub fn delivery_count(&self) -> usize {
        self.inner.read().deliveries.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_admin(&self, admin: Admin) -> Result<()> {
        self.inner.write().admins.insert(admin.id, admin);
        Ok(())
    }

    async fn admin(&self, id: AdminId) -> Result<Option<Admin>> {
        Ok(self.inner.read().admins.get(&id).cloned())
    }

    async fn insert_property(&self, property: Property) -> Result<()> {
        self.inner.write().properties.insert(property.id, property);
        Ok(())
    }

    async fn property(&self, id: PropertyId) -> Result<Option<Property>> {
        Ok(self.inner.read().properties.get(&id).cloned())
    }

    async fn check_in(&self, visitor: Visitor) -> Result<()> {
        self.inner.write().visitors.insert(visitor.id, visitor);
        Ok(())
    }

    async fn visitor(&self, id: VisitorId) -> Result<Option<Visitor>> {
        Ok(self.inner.read().visitors.get(&id).cloned())
    }

    async fn attach_feedback(&self, feedback: Feedback) -> Result<()> {
        let mut inner = self.inner.write();

        if !inner.visitors.contains_key(&feedback.visitor_id) {
            return Err(StoreError::VisitorNotFound(feedback.visitor_id));
        }

        match inner.feedback.entry(feedback.visitor_id) {
            Entry::Occupied(_) => Err(StoreError::FeedbackExists(feedback.visitor_id)),
            Entry::Vacant(slot) => {
                slot.insert(feedback);
                Ok(())
            }
        }
    }

    async fn feedback_for(&self, visitor_id: VisitorId) -> Result<Option<Feedback>> {
        Ok(self.inner.read().feedback.get(&visitor_id).cloned())
    }

    async fn save_campaign(&self, campaign: Campaign) -> Result<()> {
        self.inner.write().campaigns.insert(campaign.id, campaign);
        Ok(())
    }

    async fn campaign(&self, id: CampaignId) -> Result<Option<Campaign>> {
        Ok(self.inner.read().campaigns.get(&id).cloned())
    }

    async fn record_unsubscribe(&self, entry: Unsubscribe) -> Result<()> {
        self.inner.write().unsubscribes.push(entry);
        Ok(())
    }

    async fn record_delivery(&self, entry: DeliveryLogEntry) -> Result<DeliveryLogId> {
        let mut inner = self.inner.write();

        if entry.status.suppresses_resend() {
            let duplicate = inner.deliveries.iter().any(|existing| {
                existing.campaign_id == entry.campaign_id
                    && existing.visitor_id == entry.visitor_id
                    && existing.channel == entry.channel
                    && existing.status.suppresses_resend()
            });
            if duplicate {
                debug!(
                    campaign = %entry.campaign_id,
                    visitor = %entry.visitor_id,
                    channel = %entry.channel,
                    "rejecting duplicate delivery entry"
                );
                return Err(StoreError::DuplicateDelivery {
                    campaign_id: entry.campaign_id,
                    visitor_id: entry.visitor_id,
                    channel: entry.channel,
                });
            }
        }

        let id = entry.id;
        inner.deliveries.push(entry);
        Ok(id)
    }

    async fn deliveries_for_campaign(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Vec<DeliveryLogEntry>> {
        Ok(self
            .inner
            .read()
            .deliveries
            .iter()
            .filter(|entry| entry.campaign_id == campaign_id)
            .cloned()
            .collect())
    }

    async fn deliveries_for_visitor(
        &self,
        visitor_id: VisitorId,
    ) -> Result<Vec<DeliveryLogEntry>> {
        Ok(self
            .inner
            .read()
            .deliveries
            .iter()
            .filter(|entry| entry.visitor_id == visitor_id)
            .cloned()
            .collect())
    }

    async fn recent_deliveries(&self, limit: usize) -> Result<Vec<DeliveryLogEntry>> {
        Ok(self
            .inner
            .read()
            .deliveries
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn campaign_stats(&self, campaign_id: CampaignId) -> Result<CampaignStats> {
        let inner = self.inner.read();
        let mut stats = CampaignStats::default();

        for entry in inner
            .deliveries
            .iter()
            .filter(|entry| entry.campaign_id == campaign_id)
        {
            stats.total += 1;
            match entry.status {
                DeliveryStatus::Failed => stats.failed += 1,
                DeliveryStatus::Pending => {}
                _ => stats.sent += 1,
            }
        }

        Ok(stats)
    }

    async fn campaign_view(&self, campaign_id: CampaignId) -> Result<CampaignView> {
        let inner = self.inner.read();

        let mut visitors: Vec<VisitorContext> = inner
            .visitors
            .values()
            .map(|visitor| VisitorContext {
                property: visitor
                    .property_id
                    .and_then(|id| inner.properties.get(&id).cloned()),
                feedback: inner.feedback.get(&visitor.id).cloned(),
                visitor: visitor.clone(),
            })
            .collect();
        visitors.sort_by_key(|context| context.visitor.id);

        let deliveries = inner
            .deliveries
            .iter()
            .filter(|entry| entry.campaign_id == campaign_id)
            .cloned()
            .collect();

        Ok(CampaignView {
            visitors,
            unsubscribes: inner.unsubscribes.clone(),
            deliveries,
        })
    }
}

#[cfg(test)]
mod tests {
    use doorstep_common::{AttemptRecord, Channel, MessageType, TriggerCondition};

    use super::*;

    fn attempt(
        campaign_id: CampaignId,
        visitor_id: VisitorId,
        channel: Channel,
    ) -> AttemptRecord {
        AttemptRecord {
            visitor_id,
            campaign_id,
            property_id: None,
            channel,
            recipient: "jane@example.com".to_string(),
            subject: None,
            body: "Hi".to_string(),
        }
    }

    #[tokio::test]
    async fn feedback_is_one_per_visitor() {
        let store = MemoryStore::new();
        let visitor = Visitor::check_in("Jane", None);
        let visitor_id = visitor.id;
        store.check_in(visitor).await.unwrap();

        store
            .attach_feedback(Feedback::new(visitor_id, true, 5))
            .await
            .unwrap();

        let second = store
            .attach_feedback(Feedback::new(visitor_id, false, 2))
            .await;
        assert!(matches!(second, Err(StoreError::FeedbackExists(id)) if id == visitor_id));

        // The original record is untouched
        let stored = store.feedback_for(visitor_id).await.unwrap().unwrap();
        assert!(stored.interested);
        assert_eq!(stored.rating, 5);
    }

    #[tokio::test]
    async fn feedback_requires_existing_visitor() {
        let store = MemoryStore::new();
        let missing = VisitorId::generate();
        let outcome = store.attach_feedback(Feedback::new(missing, true, 4)).await;
        assert!(matches!(outcome, Err(StoreError::VisitorNotFound(id)) if id == missing));
    }

    #[tokio::test]
    async fn duplicate_non_failed_delivery_is_rejected() {
        let store = MemoryStore::new();
        let campaign_id = CampaignId::generate();
        let visitor_id = VisitorId::generate();

        store
            .record_delivery(DeliveryLogEntry::sent(
                attempt(campaign_id, visitor_id, Channel::Email),
                None,
            ))
            .await
            .unwrap();

        let second = store
            .record_delivery(DeliveryLogEntry::sent(
                attempt(campaign_id, visitor_id, Channel::Email),
                None,
            ))
            .await;
        assert!(second.is_err_and(|error| error.is_duplicate_delivery()));

        // A different channel for the same pair is fine
        store
            .record_delivery(DeliveryLogEntry::sent(
                attempt(campaign_id, visitor_id, Channel::Sms),
                None,
            ))
            .await
            .unwrap();

        let for_visitor = store.deliveries_for_visitor(visitor_id).await.unwrap();
        assert_eq!(for_visitor.len(), 2);
    }

    #[tokio::test]
    async fn failed_entries_stack_and_allow_later_success() {
        let store = MemoryStore::new();
        let campaign_id = CampaignId::generate();
        let visitor_id = VisitorId::generate();

        for _ in 0..2 {
            store
                .record_delivery(DeliveryLogEntry::failed(
                    attempt(campaign_id, visitor_id, Channel::Email),
                    "connection refused",
                ))
                .await
                .unwrap();
        }

        store
            .record_delivery(DeliveryLogEntry::sent(
                attempt(campaign_id, visitor_id, Channel::Email),
                None,
            ))
            .await
            .unwrap();

        let stats = store.campaign_stats(campaign_id).await.unwrap();
        assert_eq!(stats.sent, 1);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.total, 3);
    }

    #[tokio::test]
    async fn recent_deliveries_returns_newest_first() {
        let store = MemoryStore::new();
        let campaign_id = CampaignId::generate();

        let first = VisitorId::generate();
        let second = VisitorId::generate();
        store
            .record_delivery(DeliveryLogEntry::sent(
                attempt(campaign_id, first, Channel::Email),
                None,
            ))
            .await
            .unwrap();
        store
            .record_delivery(DeliveryLogEntry::sent(
                attempt(campaign_id, second, Channel::Email),
                None,
            ))
            .await
            .unwrap();

        let recent = store.recent_deliveries(1).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].visitor_id, second);
    }

    #[tokio::test]
    async fn campaign_view_joins_and_orders_visitors() {
        let store = MemoryStore::new();
        let admin = Admin::new("Alex", "alex@agency.example");
        let property = Property::new("Maple House", "12 Maple St", admin.id);
        let property_id = property.id;
        store.insert_admin(admin).await.unwrap();
        store.insert_property(property).await.unwrap();

        let first = Visitor::check_in("Jane", Some(property_id));
        let second = Visitor::check_in("John", None);
        let first_id = first.id;
        let second_id = second.id;
        store.check_in(second).await.unwrap();
        store.check_in(first).await.unwrap();
        store
            .attach_feedback(Feedback::new(first_id, true, 5))
            .await
            .unwrap();

        let campaign = Campaign::new(
            "thanks",
            AdminId::generate(),
            MessageType::Email,
            TriggerCondition::All,
        );
        let view = store.campaign_view(campaign.id).await.unwrap();

        assert_eq!(view.visitors.len(), 2);
        // Creation order regardless of insertion order
        let ids: Vec<VisitorId> = view.visitors.iter().map(|c| c.visitor.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);

        let jane = view
            .visitors
            .iter()
            .find(|c| c.visitor.id == first_id)
            .unwrap();
        assert!(jane.interested());
        assert_eq!(jane.property.as_ref().unwrap().name, "Maple House");

        let john = view
            .visitors
            .iter()
            .find(|c| c.visitor.id == second_id)
            .unwrap();
        assert!(!john.has_feedback());
        assert!(john.property.is_none());
    }
}
