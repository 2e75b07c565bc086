//! Activation lifecycle — the start/stop contract offered to the hosting
//! collaborator.
//!
//! [`start`] validates the configuration, drives the connection through
//! the handshake, and hands back an [`Activation`]. Everything that goes
//! wrong before streaming begins surfaces directly from [`start`]; after
//! that, the activation ends only on explicit stop or transport loss.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use hubwatch_domain::config::TriggerConfig;
use hubwatch_domain::credential::Credential;
use hubwatch_domain::id::ActivationId;
use hubwatch_domain::subscription::build_requests;

use crate::connection::{Connection, HANDSHAKE_TIMEOUT};
use crate::dispatch::{EventDispatcher, OutputSink};
use crate::error::ClientError;
use crate::transport::Connector;

/// Handle to a live activation.
///
/// Dropping the handle without calling [`stop`](Self::stop) also tears the
/// connection down; the socket never outlives its activation.
pub struct Activation {
    id: ActivationId,
    stop: watch::Sender<bool>,
    task: JoinHandle<Result<(), ClientError>>,
}

impl Activation {
    /// Identifier of this activation, for log correlation.
    #[must_use]
    pub fn id(&self) -> ActivationId {
        self.id
    }

    /// Request teardown.
    ///
    /// Idempotent and infallible: safe to call from any state, any number
    /// of times, including after the activation already failed. The socket
    /// close side effect happens exactly once.
    pub fn stop(&self) {
        self.stop.send_replace(true);
    }

    /// Wait for the activation to finish.
    ///
    /// Resolves with `Ok(())` after an explicit [`stop`](Self::stop), and
    /// with the terminal [`ClientError`] on unrecoverable failure.
    ///
    /// # Errors
    ///
    /// Returns the error that ended the stream, or a connection error if
    /// the streaming task was aborted externally.
    pub async fn join(self) -> Result<(), ClientError> {
        match self.task.await {
            Ok(result) => result,
            Err(err) => Err(ClientError::Connection {
                description: format!("streaming task aborted: {err}"),
            }),
        }
    }
}

/// Start one activation with the default handshake deadline.
///
/// # Errors
///
/// Returns [`ClientError`] for invalid configuration and for any failure
/// before the connection reaches its streaming state.
pub async fn start<C, S>(
    connector: C,
    config: TriggerConfig,
    credential: Credential,
    sink: S,
) -> Result<Activation, ClientError>
where
    C: Connector,
    C::Transport: 'static,
    S: OutputSink + 'static,
{
    start_with_timeout(connector, config, credential, sink, HANDSHAKE_TIMEOUT).await
}

/// Start one activation with an explicit handshake deadline.
///
/// # Errors
///
/// Returns [`ClientError`] for invalid configuration and for any failure
/// before the connection reaches its streaming state.
pub async fn start_with_timeout<C, S>(
    connector: C,
    config: TriggerConfig,
    credential: Credential,
    sink: S,
    handshake_timeout: Duration,
) -> Result<Activation, ClientError>
where
    C: Connector,
    C::Transport: 'static,
    S: OutputSink + 'static,
{
    config.validate()?;
    let requests = build_requests(&config)?;
    let dispatcher = EventDispatcher::new(&config, sink);
    let id = ActivationId::new();

    tracing::debug!(
        %id,
        url = %config.ws_url,
        event_type = %config.event_type,
        subscriptions = requests.len(),
        "activation connecting"
    );

    let mut connection = Connection::establish(
        &connector,
        &config.ws_url,
        &credential,
        &requests,
        handshake_timeout,
    )
    .await?;

    let (stop_tx, mut stop_rx) = watch::channel(false);
    let task = tokio::spawn(async move {
        let result = connection.stream(&dispatcher, &mut stop_rx).await;
        match &result {
            Ok(()) => tracing::info!(%id, "activation closed"),
            Err(err) => tracing::error!(%id, %err, "activation failed"),
        }
        result
    });

    tracing::info!(%id, "activation streaming");
    Ok(Activation {
        id,
        stop: stop_tx,
        task,
    })
}
