//! Requirer-side client for the pushgateway `push-endpoint` integration.
//!
//! Deliberately decoupled from the operator crates: this is the other side
//! of the relation, speaking only the published endpoint URL and the
//! Pushgateway simple push API.

pub mod client;
pub mod output;

pub use client::{PushClient, PushError};
