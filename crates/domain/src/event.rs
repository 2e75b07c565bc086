//! Inbound events and the records emitted to the hosting collaborator.
//!
//! An [`InboundEvent`] lives for a single dispatch call; nothing here is
//! persisted. The states are kept as raw JSON values because the hub may
//! push anything from a bare string to a nested state object.

use serde::{Deserialize, Serialize};

/// One event pushed by the hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Event name, e.g. `state_changed`.
    pub event_type: String,
    /// Event payload.
    #[serde(default)]
    pub data: EventData,
}

/// Payload of an inbound event.
///
/// Fields beyond the well-known trio are preserved verbatim in `extra` so
/// full-payload output loses nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    /// Entity the event concerns, when the event is entity-scoped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    /// State before the transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_state: Option<serde_json::Value>,
    /// State after the transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_state: Option<serde_json::Value>,
    /// Any additional payload fields the hub attached.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// What the dispatcher hands to the consumer for each matching event.
///
/// Which variant is produced is decided by the `include_event_data`
/// configuration flag; the record is handed over and then discarded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutputRecord {
    /// Compact form: entity id plus its new state only.
    State {
        entity_id: String,
        state: Option<serde_json::Value>,
    },
    /// The full inbound event.
    Full(InboundEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_event_with_state_transition() {
        let event: InboundEvent = serde_json::from_str(
            r#"{
                "event_type": "state_changed",
                "data": {
                    "entity_id": "light.kitchen",
                    "old_state": "off",
                    "new_state": "on"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(event.event_type, "state_changed");
        assert_eq!(event.data.entity_id.as_deref(), Some("light.kitchen"));
        assert_eq!(event.data.new_state, Some(serde_json::json!("on")));
    }

    #[test]
    fn should_parse_event_without_data() {
        let event: InboundEvent =
            serde_json::from_str(r#"{"event_type": "service_registered"}"#).unwrap();
        assert_eq!(event.event_type, "service_registered");
        assert!(event.data.entity_id.is_none());
    }

    #[test]
    fn should_keep_unknown_payload_fields() {
        let event: InboundEvent = serde_json::from_str(
            r#"{
                "event_type": "state_changed",
                "data": {
                    "entity_id": "sensor.hall",
                    "new_state": {"state": "22.5", "unit": "°C"},
                    "origin": "LOCAL"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(
            event.data.extra.get("origin"),
            Some(&serde_json::json!("LOCAL"))
        );
    }

    #[test]
    fn should_serialize_compact_record_as_entity_and_state() {
        let record = OutputRecord::State {
            entity_id: "light.kitchen".to_owned(),
            state: Some(serde_json::json!("on")),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"entity_id": "light.kitchen", "state": "on"})
        );
    }

    #[test]
    fn should_serialize_full_record_as_the_event() {
        let event: InboundEvent = serde_json::from_str(
            r#"{"event_type": "state_changed", "data": {"entity_id": "light.kitchen"}}"#,
        )
        .unwrap();
        let json = serde_json::to_value(OutputRecord::Full(event)).unwrap();
        assert_eq!(json["event_type"], "state_changed");
        assert_eq!(json["data"]["entity_id"], "light.kitchen");
    }
}
