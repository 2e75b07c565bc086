//! Event dispatch — filters inbound events and emits output records.

use std::future::Future;

use tokio::sync::mpsc;

use hubwatch_domain::config::TriggerConfig;
use hubwatch_domain::event::{InboundEvent, OutputRecord};
use hubwatch_domain::filter::EventFilter;

use crate::error::DispatchError;

/// Consumer-side port that receives output records.
///
/// Implementations must not block indefinitely; backpressure beyond a
/// bounded buffer is the hosting collaborator's concern.
pub trait OutputSink: Send + Sync {
    /// Hand one record to the consumer.
    fn deliver(
        &self,
        record: OutputRecord,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send;
}

/// [`OutputSink`] backed by a bounded tokio mpsc channel.
pub struct ChannelSink {
    sender: mpsc::Sender<OutputRecord>,
}

impl ChannelSink {
    /// Create a sink and the receiver the hosting collaborator reads from.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<OutputRecord>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

impl OutputSink for ChannelSink {
    async fn deliver(&self, record: OutputRecord) -> Result<(), DispatchError> {
        self.sender
            .send(record)
            .await
            .map_err(|_| DispatchError::SinkClosed)
    }
}

/// Applies the event filter and payload policy to each inbound event.
pub struct EventDispatcher<S> {
    filter: EventFilter,
    include_event_data: bool,
    sink: S,
}

impl<S: OutputSink> EventDispatcher<S> {
    /// Build a dispatcher for a configuration and sink.
    #[must_use]
    pub fn new(config: &TriggerConfig, sink: S) -> Self {
        Self {
            filter: EventFilter::from_config(config),
            include_event_data: config.include_event_data,
            sink,
        }
    }

    /// Dispatch one inbound event.
    ///
    /// Returns `Ok(false)` when the event does not match the filter (no
    /// output, no error), `Ok(true)` when a record was delivered.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] for a matching event that cannot be
    /// normalized or delivered. Callers isolate these per event.
    pub async fn dispatch(&self, event: InboundEvent) -> Result<bool, DispatchError> {
        if !self.filter.matches(&event) {
            return Ok(false);
        }

        let record = if self.include_event_data {
            OutputRecord::Full(event)
        } else {
            let entity_id = event
                .data
                .entity_id
                .clone()
                .ok_or(DispatchError::MissingEntityId)?;
            OutputRecord::State {
                entity_id,
                state: event.data.new_state,
            }
        };

        self.sink.deliver(record).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(json: serde_json::Value) -> InboundEvent {
        serde_json::from_value(json).unwrap()
    }

    fn config(event_type: &str, entity_id: &str, include_event_data: bool) -> TriggerConfig {
        TriggerConfig {
            event_type: event_type.to_owned(),
            entity_id: entity_id.to_owned(),
            include_event_data,
            ..TriggerConfig::default()
        }
    }

    #[tokio::test]
    async fn should_emit_compact_record_for_matching_event() {
        let (sink, mut rx) = ChannelSink::new(4);
        let dispatcher = EventDispatcher::new(&config("state_changed", "", false), sink);

        let emitted = dispatcher
            .dispatch(event(serde_json::json!({
                "event_type": "state_changed",
                "data": {
                    "entity_id": "light.kitchen",
                    "old_state": "off",
                    "new_state": "on"
                }
            })))
            .await
            .unwrap();
        assert!(emitted);

        let record = rx.recv().await.unwrap();
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({"entity_id": "light.kitchen", "state": "on"})
        );
    }

    #[tokio::test]
    async fn should_emit_full_event_when_payload_is_included() {
        let (sink, mut rx) = ChannelSink::new(4);
        let dispatcher = EventDispatcher::new(&config("state_changed", "", true), sink);

        dispatcher
            .dispatch(event(serde_json::json!({
                "event_type": "state_changed",
                "data": {
                    "entity_id": "light.kitchen",
                    "old_state": "off",
                    "new_state": "on",
                    "origin": "LOCAL"
                }
            })))
            .await
            .unwrap();

        let record = rx.recv().await.unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["event_type"], "state_changed");
        assert_eq!(json["data"]["old_state"], "off");
        assert_eq!(json["data"]["origin"], "LOCAL");
    }

    #[tokio::test]
    async fn should_drop_non_matching_event_without_error() {
        let (sink, mut rx) = ChannelSink::new(4);
        let dispatcher = EventDispatcher::new(&config("state_changed", "light.kitchen", false), sink);

        let emitted = dispatcher
            .dispatch(event(serde_json::json!({
                "event_type": "state_changed",
                "data": {"entity_id": "light.bedroom", "new_state": "on"}
            })))
            .await
            .unwrap();
        assert!(!emitted);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn should_fail_compact_mode_for_event_without_entity() {
        let (sink, _rx) = ChannelSink::new(4);
        let dispatcher = EventDispatcher::new(&config("state_changed", "", false), sink);

        let result = dispatcher
            .dispatch(event(serde_json::json!({"event_type": "state_changed"})))
            .await;
        assert!(matches!(result, Err(DispatchError::MissingEntityId)));
    }

    #[tokio::test]
    async fn should_report_closed_sink() {
        let (sink, rx) = ChannelSink::new(4);
        drop(rx);
        let dispatcher = EventDispatcher::new(&config("state_changed", "", true), sink);

        let result = dispatcher
            .dispatch(event(serde_json::json!({
                "event_type": "state_changed",
                "data": {"entity_id": "light.kitchen"}
            })))
            .await;
        assert!(matches!(result, Err(DispatchError::SinkClosed)));
    }
}
