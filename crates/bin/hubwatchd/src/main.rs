//! # hubwatchd — hubwatch daemon
//!
//! Composition root that plays the hosting collaborator: it wires the
//! subscription client to a terminal consumer.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env var overrides)
//! - Initialise tracing
//! - Look the credential up from the environment
//! - Start one activation and print each output record as a JSON line
//! - Stop the activation on Ctrl-C and exit with its result
//!
//! ## Dependency rule
//! This is the only crate that depends on both `hubwatch-domain` and
//! `hubwatch-client`. It is the wiring layer — no protocol logic belongs
//! here.

mod config;

use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

use hubwatch_client::{ChannelSink, WsConnector, start};
use hubwatch_domain::Credential;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let token = std::env::var(&config.hub.token_env)
        .with_context(|| format!("credential env var {} is not set", config.hub.token_env))?;
    let credential = Credential::new(token)?;

    let (sink, mut records) = ChannelSink::new(64);
    let activation = start(WsConnector, config.trigger_config(), credential, sink).await?;
    tracing::info!(id = %activation.id(), "subscription active, streaming records to stdout");

    loop {
        tokio::select! {
            record = records.recv() => match record {
                Some(record) => println!("{}", serde_json::to_string(&record)?),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                activation.stop();
                break;
            }
        }
    }

    activation.join().await?;
    Ok(())
}
