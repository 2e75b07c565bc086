//! Event filtering — decides which inbound events reach the consumer.

use std::collections::BTreeSet;

use crate::config::{TriggerConfig, WILDCARD_EVENT_TYPE};
use crate::event::InboundEvent;

/// Pure predicate deciding whether an inbound event satisfies the
/// configured subscription.
///
/// Both conditions must hold: the event type matches (or the filter is the
/// wildcard), and the entity id is in the configured set (or the set is
/// empty). Entity ids are compared after trimming both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    event_type: String,
    entity_ids: BTreeSet<String>,
}

impl EventFilter {
    /// Build the filter for a configuration.
    #[must_use]
    pub fn from_config(config: &TriggerConfig) -> Self {
        Self {
            event_type: config.event_type.trim().to_owned(),
            entity_ids: config.entity_ids(),
        }
    }

    /// Check whether this filter matches a given event.
    #[must_use]
    pub fn matches(&self, event: &InboundEvent) -> bool {
        if self.event_type != WILDCARD_EVENT_TYPE && event.event_type != self.event_type {
            return false;
        }
        if self.entity_ids.is_empty() {
            return true;
        }
        event
            .data
            .entity_id
            .as_deref()
            .map(str::trim)
            .is_some_and(|id| self.entity_ids.contains(id))
    }
}
