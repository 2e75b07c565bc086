//! Transport port — the only place a socket is touched.
//!
//! [`Connection`](crate::connection::Connection) drives the protocol
//! against these traits; the websocket implementation lives here and test
//! code substitutes scripted fakes.

use std::future::Future;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::error::TransportError;
use crate::wire::{ClientFrame, ServerFrame};

/// A connected, message-based socket speaking the hub wire protocol.
pub trait Transport: Send {
    /// Serialize and send a single frame.
    fn send(
        &mut self,
        frame: ClientFrame,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Wait for the next inbound frame. `None` means the peer closed.
    fn next_frame(
        &mut self,
    ) -> impl Future<Output = Option<Result<ServerFrame, TransportError>>> + Send;

    /// Close the underlying socket. Must be idempotent.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

/// Opens a [`Transport`] for a given endpoint.
pub trait Connector: Send + Sync {
    /// The transport type produced on success.
    type Transport: Transport;

    /// Establish the transport connection.
    fn connect(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Self::Transport, TransportError>> + Send;
}

/// [`Connector`] backed by tokio-tungstenite (`ws://` and `wss://`).
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

impl Connector for WsConnector {
    type Transport = WsTransport;

    async fn connect(&self, url: &str) -> Result<WsTransport, TransportError> {
        let (stream, _response) = connect_async(url).await?;
        Ok(WsTransport {
            stream: Some(stream),
        })
    }
}

/// Live websocket connection to the hub.
pub struct WsTransport {
    stream: Option<WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>>,
}

impl Transport for WsTransport {
    async fn send(&mut self, frame: ClientFrame) -> Result<(), TransportError> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(TransportError::new("socket already closed"));
        };
        let text = serde_json::to_string(&frame)
            .map_err(|err| TransportError::new(format!("failed to encode frame: {err}")))?;
        stream.send(Message::Text(text.into())).await?;
        Ok(())
    }

    async fn next_frame(&mut self) -> Option<Result<ServerFrame, TransportError>> {
        let stream = self.stream.as_mut()?;
        loop {
            match stream.next().await? {
                Ok(Message::Text(text)) => {
                    return Some(serde_json::from_str(text.as_str()).map_err(|err| {
                        TransportError::new(format!("failed to decode frame: {err}"))
                    }));
                }
                Ok(Message::Close(_)) => return None,
                // Pings are answered by tungstenite itself; binary frames
                // are not part of the protocol.
                Ok(_) => {}
                Err(err) => return Some(Err(err.into())),
            }
        }
    }

    async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.close(None).await;
        }
    }
}
