//! Doorstep: visitor check-in and follow-up messaging for open houses.
//!
//! This crate ties the workspace together for the binary: TOML
//! configuration ([`config`]), seed-data loading into the in-memory store
//! ([`seed`]), and re-exports of the member crates.

pub mod config;
pub mod seed;

pub use doorstep_common as common;
pub use doorstep_dispatch as dispatch;
pub use doorstep_store as store;
pub use doorstep_template as template;
