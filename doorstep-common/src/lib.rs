//! Shared domain model for the Doorstep follow-up engine.
//!
//! Every crate in the workspace speaks in these records:
//! - Check-in book: [`Visitor`], [`Property`], [`Feedback`], [`Admin`]
//! - Campaign configuration: [`Campaign`] and its enums
//! - Delivery log: [`DeliveryLogEntry`], [`DeliveryStatus`], [`Channel`]
//! - Opt-outs: [`Unsubscribe`]
//!
//! Identifiers are ULID-backed newtypes ([`id`]); their lexicographic order
//! is creation order, which downstream code relies on for deterministic
//! eligibility ordering.

pub mod admin;
pub mod campaign;
pub mod delivery;
pub mod feedback;
pub mod id;
pub mod logging;
pub mod property;
pub mod unsubscribe;
pub mod visitor;

pub use admin::Admin;
pub use campaign::{Campaign, CampaignStatus, ContentError, MessageType, TriggerCondition};
pub use delivery::{AttemptRecord, Channel, DeliveryLogEntry, DeliveryStatus};
pub use feedback::Feedback;
pub use id::{AdminId, CampaignId, DeliveryLogId, FeedbackId, PropertyId, UnsubscribeId, VisitorId};
pub use property::{Property, PropertyStatus};
pub use unsubscribe::{Unsubscribe, UnsubscribeScope};
pub use visitor::Visitor;

pub use tracing;
