//! Error types for store operations.

use doorstep_common::{CampaignId, Channel, VisitorId};
use thiserror::Error;

/// Errors returned by [`Store`](crate::Store) implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced visitor does not exist.
    #[error("Visitor not found: {0}")]
    VisitorNotFound(VisitorId),

    /// A feedback record already exists for this visitor. Feedback is
    /// strictly one-per-visitor.
    #[error("Feedback already recorded for visitor {0}")]
    FeedbackExists(VisitorId),

    /// A non-failed delivery-log entry already exists for this
    /// (campaign, visitor, channel) combination.
    ///
    /// This is the serialization point for duplicate-send suppression:
    /// callers treat it as "someone else already sent this", not as a
    /// failure.
    #[error("Delivery already recorded for campaign {campaign_id}, visitor {visitor_id} on {channel}")]
    DuplicateDelivery {
        campaign_id: CampaignId,
        visitor_id: VisitorId,
        channel: Channel,
    },

    /// The backing medium failed.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns `true` for the duplicate-delivery rejection, which callers
    /// handle as suppression rather than as an error.
    #[must_use]
    pub const fn is_duplicate_delivery(&self) -> bool {
        matches!(self, Self::DuplicateDelivery { .. })
    }
}

/// Convenience alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;
