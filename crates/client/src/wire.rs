//! Wire frames exchanged with the hub.
//!
//! All frames are JSON text messages discriminated by a `type` field.
//! Server frame types this client does not consume (results, pongs, the
//! `auth_required` greeting) deserialize to [`ServerFrame::Unknown`] and
//! are ignored upstream.

use serde::{Deserialize, Serialize};

use hubwatch_domain::event::InboundEvent;
use hubwatch_domain::subscription::{SubscriptionRequest, TriggerCondition};

/// Frames sent from the client to the hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Authentication handshake carrying the access token.
    Auth { access_token: String },
    /// Raw event subscription.
    SubscribeEvents { event_type: String },
    /// Conditional state-transition subscription.
    SubscribeTrigger { trigger: TriggerCondition },
}

impl ClientFrame {
    /// Wrap a subscription request in its wire frame.
    #[must_use]
    pub fn subscription(request: SubscriptionRequest) -> Self {
        match request {
            SubscriptionRequest::Events { event_type } => Self::SubscribeEvents { event_type },
            SubscriptionRequest::Trigger(trigger) => Self::SubscribeTrigger { trigger },
        }
    }
}

/// Frames received from the hub.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// Authentication accepted.
    AuthOk,
    /// Authentication rejected.
    AuthInvalid {
        #[serde(default)]
        message: Option<String>,
    },
    /// A pushed event.
    Event {
        #[serde(flatten)]
        event: InboundEvent,
    },
    /// Any frame type this client does not consume.
    #[serde(other)]
    Unknown,
}
