//! TradeDesk Core Types and Traits
//!
//! This crate provides the domain records and abstractions shared by every
//! other TradeDesk crate:
//! - Tenant and user identifiers
//! - Organization, team, messaging, resources, settings, sourcing and
//!   logistics records with their filter predicates
//! - Store trait abstractions
//! - Core error types

pub mod billing;
pub mod error;
pub mod filter;
pub mod logistics;
pub mod messaging;
pub mod organization;
pub mod resources;
pub mod settings;
pub mod sourcing;
pub mod store;
pub mod team;
pub mod tenant;

pub use error::{Error, Result};
pub use tenant::{TenantId, UserId};

/// Generate a prefixed record id, e.g. `conv_4f1c...`.
pub fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
}
