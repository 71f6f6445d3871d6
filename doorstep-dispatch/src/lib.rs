//! Campaign eligibility and dispatch engine.
//!
//! This crate is the decision core of Doorstep:
//! - Work out exactly which visitors a campaign run should target
//!   ([`eligibility`])
//! - Render per-visitor messages and hand them to a [`Transport`]
//! - Record every attempt in the delivery log ([`Dispatcher`])
//!
//! Re-running a send is safe by construction: visitors with a successful
//! delivery on record are suppressed during resolution, and the store's
//! delivery-log append rejects duplicates that slip through a race.

pub mod eligibility;
mod error;
pub mod transport;
mod validate;
mod variables;

mod dispatcher;

pub use dispatcher::{
    DispatchFailure, DispatchSummary, Dispatcher, SendRequest, TransportTimeouts,
};
pub use eligibility::{ChannelEligibility, EligibleVisitor, resolve};
pub use error::DispatchError;
pub use transport::{EmailMessage, SmsMessage, Transport, TransportError, TransportReceipt};
pub use validate::validate_campaign;
pub use variables::build_variables;
