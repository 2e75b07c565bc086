//! Scripted transport fakes shared by the unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::TransportError;
use crate::transport::{Connector, Transport};
use crate::wire::{ClientFrame, ServerFrame};

/// What the fake hub does once its scripted frames run out.
#[derive(Debug, Clone, Copy)]
pub(crate) enum AfterScript {
    /// Pretend the hub went away (peer close).
    CloseStream,
    /// Keep the connection open but never send anything again.
    StaySilent,
    /// Report a transport error.
    FailStream,
}

/// In-memory [`Transport`] that replays a scripted frame sequence and
/// records everything the client sends.
pub(crate) struct FakeTransport {
    script: VecDeque<ServerFrame>,
    after: AfterScript,
    pub(crate) sent: Arc<Mutex<Vec<ClientFrame>>>,
    pub(crate) closes: Arc<AtomicUsize>,
}

impl FakeTransport {
    pub(crate) fn new(script: Vec<ServerFrame>, after: AfterScript) -> Self {
        Self {
            script: script.into(),
            after,
            sent: Arc::new(Mutex::new(Vec::new())),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Transport for FakeTransport {
    async fn send(&mut self, frame: ClientFrame) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(frame);
        Ok(())
    }

    async fn next_frame(&mut self) -> Option<Result<ServerFrame, TransportError>> {
        match self.script.pop_front() {
            Some(frame) => Some(Ok(frame)),
            None => match self.after {
                AfterScript::CloseStream => None,
                AfterScript::StaySilent => std::future::pending().await,
                AfterScript::FailStream => Some(Err(TransportError::new("connection reset"))),
            },
        }
    }

    async fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// [`Connector`] handing out a single prepared [`FakeTransport`], or
/// refusing every connection attempt.
pub(crate) struct FakeConnector {
    transport: Mutex<Option<FakeTransport>>,
}

impl FakeConnector {
    pub(crate) fn with(transport: FakeTransport) -> Self {
        Self {
            transport: Mutex::new(Some(transport)),
        }
    }

    pub(crate) fn refusing() -> Self {
        Self {
            transport: Mutex::new(None),
        }
    }
}

impl Connector for FakeConnector {
    type Transport = FakeTransport;

    async fn connect(&self, _url: &str) -> Result<FakeTransport, TransportError> {
        self.transport
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| TransportError::new("connection refused"))
    }
}

/// Build a scripted `state_changed` event frame.
pub(crate) fn event_frame(entity_id: &str, new_state: &str) -> ServerFrame {
    serde_json::from_value(serde_json::json!({
        "type": "event",
        "event_type": "state_changed",
        "data": {
            "entity_id": entity_id,
            "old_state": "unknown",
            "new_state": new_state
        }
    }))
    .unwrap()
}
