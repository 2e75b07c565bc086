//! Connection state machine — owns the socket and drives the
//! authenticate → subscribe → stream lifecycle.
//!
//! One [`Connection`] exists per activation. The transport handle is owned
//! exclusively here and closed exactly once, whichever path (stop, peer
//! close, failure, handshake deadline) tears the connection down.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use hubwatch_domain::credential::Credential;
use hubwatch_domain::subscription::SubscriptionRequest;

use crate::dispatch::{EventDispatcher, OutputSink};
use crate::error::{ClientError, TransportError};
use crate::transport::{Connector, Transport};
use crate::wire::{ClientFrame, ServerFrame};

/// How long the connect/authenticate/subscribe sequence may take before
/// the activation fails with [`ClientError::Timeout`].
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Lifecycle states of a single hub connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection attempt has been made yet.
    Disconnected,
    /// The transport is being opened.
    Connecting,
    /// Waiting for the hub's verdict on the access token.
    Authenticating,
    /// Sending subscription requests.
    Subscribing,
    /// Live — inbound events are being dispatched.
    Streaming,
    /// Teardown has begun; no new dispatches start.
    Closing,
    /// The socket is closed after an orderly teardown.
    Closed,
    /// Terminal failure; the socket is closed and the activation is over.
    Failed,
}

/// Outcome of one wait in the streaming loop.
enum Step {
    Stop,
    Inbound(Option<Result<ServerFrame, TransportError>>),
}

/// Drives one websocket connection through its lifecycle.
pub struct Connection<T> {
    transport: Option<T>,
    state: ConnectionState,
}

impl<T: Transport> Connection<T> {
    /// Open the socket and drive the handshake through to
    /// [`ConnectionState::Streaming`].
    ///
    /// The whole sequence is bound to a single deadline measured from the
    /// start of the connection attempt; if it elapses first the result is
    /// [`ClientError::Timeout`]. A verdict arriving after the deadline is
    /// never processed. On any failure the socket is closed before the
    /// error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the transport cannot be opened, the
    /// hub rejects the credential, or the deadline elapses.
    pub async fn establish<C>(
        connector: &C,
        url: &str,
        credential: &Credential,
        requests: &[SubscriptionRequest],
        handshake_timeout: Duration,
    ) -> Result<Self, ClientError>
    where
        C: Connector<Transport = T>,
    {
        let deadline = Instant::now() + handshake_timeout;
        let mut connection = Self {
            transport: None,
            state: ConnectionState::Disconnected,
        };

        match connection
            .handshake(connector, url, credential, requests, deadline)
            .await
        {
            Ok(()) => {
                connection.state = ConnectionState::Streaming;
                tracing::debug!(subscriptions = requests.len(), "connection streaming");
                Ok(connection)
            }
            Err(err) => {
                connection.state = ConnectionState::Failed;
                connection.close_transport().await;
                Err(err)
            }
        }
    }

    async fn handshake<C>(
        &mut self,
        connector: &C,
        url: &str,
        credential: &Credential,
        requests: &[SubscriptionRequest],
        deadline: Instant,
    ) -> Result<(), ClientError>
    where
        C: Connector<Transport = T>,
    {
        self.state = ConnectionState::Connecting;
        let transport = bound(deadline, connector.connect(url))
            .await?
            .map_err(|err| ClientError::connection(&err))?;
        self.transport = Some(transport);

        self.state = ConnectionState::Authenticating;
        bound(
            deadline,
            self.send(ClientFrame::Auth {
                access_token: credential.token().to_owned(),
            }),
        )
        .await??;

        loop {
            match bound(deadline, self.recv()).await? {
                Some(Ok(ServerFrame::AuthOk)) => break,
                Some(Ok(ServerFrame::AuthInvalid { message })) => {
                    return Err(ClientError::Authentication { message });
                }
                // Greetings and stray frames before the verdict.
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(ClientError::connection(&err)),
                None => {
                    return Err(ClientError::Connection {
                        description: "connection closed during handshake".to_owned(),
                    });
                }
            }
        }

        self.state = ConnectionState::Subscribing;
        for request in requests {
            bound(deadline, self.send(ClientFrame::subscription(request.clone()))).await??;
        }
        Ok(())
    }

    /// Stream inbound events until the hub disconnects or `stop` fires.
    ///
    /// Events are dispatched in the order the transport delivers them.
    /// Dispatch failures are logged and isolated per event; only transport
    /// loss terminates the stream. The stop signal takes priority over
    /// frames already queued: once teardown begins no new dispatch starts.
    /// Dropping the stop sender counts as a stop request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] when the transport fails or the
    /// hub closes the connection without a stop request.
    pub async fn stream<S: OutputSink>(
        &mut self,
        dispatcher: &EventDispatcher<S>,
        stop: &mut watch::Receiver<bool>,
    ) -> Result<(), ClientError> {
        // stop() may have fired between establish() and the first poll.
        let already_stopped = *stop.borrow_and_update();
        if already_stopped {
            self.shut_down().await;
            return Ok(());
        }

        loop {
            let step = {
                let Some(transport) = self.transport.as_mut() else {
                    return Err(ClientError::Connection {
                        description: "transport not connected".to_owned(),
                    });
                };
                tokio::select! {
                    biased;
                    _ = stop.changed() => Step::Stop,
                    frame = transport.next_frame() => Step::Inbound(frame),
                }
            };

            match step {
                Step::Stop => {
                    self.shut_down().await;
                    return Ok(());
                }
                Step::Inbound(Some(Ok(ServerFrame::Event { event }))) => {
                    if let Err(err) = dispatcher.dispatch(event).await {
                        tracing::warn!(%err, "dropping undeliverable event");
                    }
                }
                Step::Inbound(Some(Ok(frame))) => {
                    tracing::trace!(?frame, "ignoring non-event frame");
                }
                Step::Inbound(Some(Err(err))) => {
                    self.state = ConnectionState::Failed;
                    self.close_transport().await;
                    return Err(ClientError::connection(&err));
                }
                Step::Inbound(None) => {
                    self.state = ConnectionState::Failed;
                    self.close_transport().await;
                    return Err(ClientError::Connection {
                        description: "connection closed by the hub".to_owned(),
                    });
                }
            }
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    async fn send(&mut self, frame: ClientFrame) -> Result<(), ClientError> {
        let Some(transport) = self.transport.as_mut() else {
            return Err(ClientError::Connection {
                description: "transport not connected".to_owned(),
            });
        };
        transport
            .send(frame)
            .await
            .map_err(|err| ClientError::connection(&err))
    }

    async fn recv(&mut self) -> Option<Result<ServerFrame, TransportError>> {
        match self.transport.as_mut() {
            Some(transport) => transport.next_frame().await,
            None => None,
        }
    }

    async fn shut_down(&mut self) {
        if matches!(
            self.state,
            ConnectionState::Closing | ConnectionState::Closed
        ) {
            return;
        }
        self.state = ConnectionState::Closing;
        self.close_transport().await;
        self.state = ConnectionState::Closed;
        tracing::debug!("connection closed");
    }

    async fn close_transport(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.close().await;
        }
    }
}

/// Bind a handshake step to the activation deadline.
async fn bound<F: Future>(deadline: Instant, step: F) -> Result<F::Output, ClientError> {
    tokio::time::timeout_at(deadline, step)
        .await
        .map_err(|_elapsed| ClientError::Timeout)
}
