//! # hubwatch-client
//!
//! Persistent, authenticated subscription client for a home-automation
//! hub's websocket event bus.
//!
//! ## How it works
//!
//! One activation owns one connection. [`lifecycle::start`] validates the
//! configuration, opens the socket, authenticates, sends the subscription
//! requests, and then streams inbound events through the filter to the
//! consumer's [`OutputSink`]. The hosting collaborator keeps the returned
//! [`Activation`] handle and calls [`Activation::stop`] on deactivation.
//!
//! ## Responsibilities
//! - Wire frames for the hub protocol (auth, subscribe, event)
//! - Transport and connector ports, plus the tokio-tungstenite transport
//! - The connection state machine (handshake deadline, teardown, close
//!   idempotence)
//! - Per-event dispatch with isolated failures
//! - The start/stop activation contract
//!
//! ## Dependency rule
//! Depends only on `hubwatch-domain`. Consumers inject the sink (and, in
//! tests, the transport); no global mutable state is shared between
//! activations.

pub mod connection;
pub mod dispatch;
pub mod error;
pub mod lifecycle;
pub mod transport;
pub mod wire;

#[cfg(test)]
pub(crate) mod testing;

pub use connection::{Connection, ConnectionState, HANDSHAKE_TIMEOUT};
pub use dispatch::{ChannelSink, EventDispatcher, OutputSink};
pub use error::{ClientError, DispatchError, TransportError};
pub use lifecycle::{Activation, start, start_with_timeout};
pub use transport::{Connector, Transport, WsConnector, WsTransport};
pub use wire::{ClientFrame, ServerFrame};
