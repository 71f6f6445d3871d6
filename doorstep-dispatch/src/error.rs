//! Typed error handling for dispatch operations.
//!
//! Only failures that abort a whole campaign run live here. Per-visitor
//! transport failures are not errors at this level: they are recorded in
//! the delivery log, counted, and surfaced through
//! [`DispatchSummary::failures`](crate::DispatchSummary).

use doorstep_common::{AdminId, CampaignId, campaign::ContentError};
use doorstep_store::StoreError;
use thiserror::Error;

/// Hard failures that abort a campaign send before any message goes out.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The campaign does not exist.
    #[error("Campaign not found: {0}")]
    CampaignNotFound(CampaignId),

    /// The campaign's owning admin does not exist. Without one the
    /// `admin_*` template variables cannot be resolved, so the campaign is
    /// unsendable.
    #[error("Admin not found: {0}")]
    AdminNotFound(AdminId),

    /// The campaign is missing template content for the channels it is
    /// being sent on, or its templates reference unknown variables.
    #[error("Invalid campaign configuration: {0}")]
    InvalidConfiguration(String),

    /// The backing store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl DispatchError {
    /// Returns `true` for the missing-record failures.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::CampaignNotFound(_) | Self::AdminNotFound(_))
    }

    /// Returns `true` when the campaign configuration itself is at fault.
    #[must_use]
    pub const fn is_invalid_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }
}

impl From<ContentError> for DispatchError {
    fn from(error: ContentError) -> Self {
        Self::InvalidConfiguration(error.to_string())
    }
}
