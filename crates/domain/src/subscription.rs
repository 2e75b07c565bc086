//! Subscription requests — what the client asks the hub to stream.
//!
//! A configuration expands into an ordered list of requests once per
//! activation. The hub's conditional trigger call is scoped to a single
//! entity, so trigger mode produces one request per configured entity id.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::TriggerConfig;
use crate::error::ConfigError;

/// Platform marker carried by every conditional trigger subscription.
const STATE_PLATFORM: &str = "state";

/// A single wire-level subscription to request from the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriptionRequest {
    /// Raw subscription to an event type (`"*"` for all events).
    Events { event_type: String },
    /// Conditional subscription keyed on state transitions of one entity.
    Trigger(TriggerCondition),
}

/// Condition block of a trigger subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerCondition {
    /// Always `"state"` — the only platform this client subscribes to.
    pub platform: String,
    /// The single entity this condition watches.
    pub entity_id: String,
    /// States the entity must transition from, when restricted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Vec<String>>,
    /// States the entity must transition to, when restricted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Vec<String>>,
}

/// Expand a configuration into the ordered subscription requests for one
/// activation.
///
/// # Errors
///
/// Returns [`ConfigError`] when the event type is blank, or when trigger
/// mode is selected without any entity ids.
pub fn build_requests(config: &TriggerConfig) -> Result<Vec<SubscriptionRequest>, ConfigError> {
    let event_type = config.event_type.trim();
    if event_type.is_empty() {
        return Err(ConfigError::MissingEventType);
    }

    if !config.is_trigger() {
        return Ok(vec![SubscriptionRequest::Events {
            event_type: event_type.to_owned(),
        }]);
    }

    let entity_ids = config.entity_ids();
    if entity_ids.is_empty() {
        return Err(ConfigError::MissingEntityIds);
    }
    let from = non_empty(config.from_states());
    let to = non_empty(config.to_states());

    Ok(entity_ids
        .into_iter()
        .map(|entity_id| {
            SubscriptionRequest::Trigger(TriggerCondition {
                platform: STATE_PLATFORM.to_owned(),
                entity_id,
                from: from.clone(),
                to: to.clone(),
            })
        })
        .collect())
}

fn non_empty(states: BTreeSet<String>) -> Option<Vec<String>> {
    if states.is_empty() {
        None
    } else {
        Some(states.into_iter().collect())
    }
}
