//! # hubwatch-domain
//!
//! Pure domain model for the hubwatch event-bus subscription client.
//!
//! ## Responsibilities
//! - Define the **trigger configuration** supplied by the hosting
//!   collaborator (url, event type, entity/state filters, payload policy)
//! - Define the **credential** used for the authentication handshake
//! - Expand a configuration into wire-level **subscription requests**
//! - Define **inbound events** and the **output records** emitted for them
//! - Contain the pure **filter predicate** deciding which events match
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! It must never import anything from the client crate or from transport
//! libraries. All IO boundaries are expressed as traits in
//! `hubwatch-client` (ports).

pub mod config;
pub mod credential;
pub mod error;
pub mod event;
pub mod filter;
pub mod id;
pub mod subscription;

pub use config::TriggerConfig;
pub use credential::Credential;
pub use error::ConfigError;
pub use event::{EventData, InboundEvent, OutputRecord};
pub use filter::EventFilter;
pub use id::ActivationId;
pub use subscription::{SubscriptionRequest, TriggerCondition, build_requests};
