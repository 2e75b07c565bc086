//! Trigger configuration — the raw values supplied by the hosting
//! collaborator.
//!
//! Entity ids and state filters arrive as comma-separated strings and are
//! expanded into trimmed sets on demand. `from_state`/`to_state` are only
//! meaningful when [`TriggerConfig::is_trigger`] is true.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Sentinel event type selecting conditional trigger subscriptions.
pub const TRIGGER_EVENT_TYPE: &str = "subscribe_trigger";

/// Wildcard event type matching every event the hub pushes.
pub const WILDCARD_EVENT_TYPE: &str = "*";

/// Configuration for one event-bus subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// WebSocket endpoint of the hub (`ws://` or `wss://`).
    pub ws_url: String,
    /// Event type to subscribe to: a concrete event name, `"*"`, or the
    /// `"subscribe_trigger"` sentinel.
    pub event_type: String,
    /// Comma-separated entity ids to monitor. Empty means all entities.
    pub entity_id: String,
    /// Comma-separated states to transition *from* (trigger mode only).
    pub from_state: String,
    /// Comma-separated states to transition *to* (trigger mode only).
    pub to_state: String,
    /// Whether output records carry the full event payload.
    pub include_event_data: bool,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            ws_url: String::new(),
            event_type: "state_changed".to_owned(),
            entity_id: String::new(),
            from_state: String::new(),
            to_state: String::new(),
            include_event_data: true,
        }
    }
}

impl TriggerConfig {
    /// Check the fields that must be present before connecting.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the url or event type is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ws_url.trim().is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        if self.event_type.trim().is_empty() {
            return Err(ConfigError::MissingEventType);
        }
        Ok(())
    }

    /// Whether this configuration selects conditional trigger
    /// subscriptions rather than a raw event subscription.
    #[must_use]
    pub fn is_trigger(&self) -> bool {
        self.event_type.trim() == TRIGGER_EVENT_TYPE
    }

    /// Entity ids expanded from the comma-separated field.
    #[must_use]
    pub fn entity_ids(&self) -> BTreeSet<String> {
        split_list(&self.entity_id)
    }

    /// From-states expanded from the comma-separated field.
    #[must_use]
    pub fn from_states(&self) -> BTreeSet<String> {
        split_list(&self.from_state)
    }

    /// To-states expanded from the comma-separated field.
    #[must_use]
    pub fn to_states(&self) -> BTreeSet<String> {
        split_list(&self.to_state)
    }
}

/// Split a comma-separated list, trimming whitespace and dropping empties.
fn split_list(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect()
}
