//! Client error types.

use hubwatch_domain::error::ConfigError;

/// Fatal errors surfaced by an activation.
///
/// Everything here terminates the activation; the socket is closed before
/// the error propagates. Per-event problems are [`DispatchError`] instead
/// and never appear at this level.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Missing or invalid user input, detected before any connection
    /// attempt.
    #[error("invalid trigger configuration")]
    Config(#[from] ConfigError),

    /// Transport-level failure while connecting or streaming.
    #[error("websocket connection error: {description}")]
    Connection { description: String },

    /// The hub rejected the access token.
    #[error("authentication rejected by the hub")]
    Authentication {
        /// Reason reported by the hub, when it sent one.
        message: Option<String>,
    },

    /// No authentication verdict arrived within the handshake deadline.
    #[error("timed out waiting for the authentication handshake")]
    Timeout,
}

impl ClientError {
    pub(crate) fn connection(err: &TransportError) -> Self {
        Self::Connection {
            description: err.to_string(),
        }
    }
}

/// Per-event dispatch failures.
///
/// These are isolated by the streaming loop: the offending event is
/// dropped and logged, and the connection stays up.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Compact output was requested but the event carries no entity id.
    #[error("event frame is missing an entity id")]
    MissingEntityId,

    /// The consumer side of the output channel is gone.
    #[error("consumer closed the output channel")]
    SinkClosed,
}

/// Failure reported by a [`Transport`](crate::transport::Transport)
/// implementation.
///
/// Carries a plain description so fakes and the websocket implementation
/// share one error shape; the description ends up in
/// [`ClientError::Connection`].
#[derive(Debug, thiserror::Error)]
#[error("{description}")]
pub struct TransportError {
    description: String,
}

impl TransportError {
    /// Wrap a transport failure description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for TransportError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::new(err.to_string())
    }
}
