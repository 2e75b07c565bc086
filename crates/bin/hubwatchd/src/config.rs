//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `hubwatch.toml` in the working directory. Every field has a
//! default so the file is optional. Environment variables take precedence
//! over file values. The credential itself never lives in the file — only
//! the name of the environment variable to read it from.

use serde::Deserialize;

use hubwatch_domain::config::TriggerConfig;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hub endpoint settings.
    pub hub: HubConfig,
    /// Subscription settings.
    pub trigger: TriggerSection,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Hub endpoint configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// WebSocket endpoint of the hub.
    pub ws_url: String,
    /// Name of the environment variable holding the access token.
    pub token_env: String,
}

/// Subscription configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TriggerSection {
    /// Event type to subscribe to.
    pub event_type: String,
    /// Comma-separated entity ids (empty = all).
    pub entity_id: String,
    /// Comma-separated from-states (trigger mode only).
    pub from_state: String,
    /// Comma-separated to-states (trigger mode only).
    pub to_state: String,
    /// Whether output records carry the full event payload.
    pub include_event_data: bool,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `hubwatch.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("hubwatch.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HUBWATCH_WS_URL") {
            self.hub.ws_url = val;
        }
        if let Ok(val) = std::env::var("HUBWATCH_EVENT_TYPE") {
            self.trigger.event_type = val;
        }
        if let Ok(val) = std::env::var("HUBWATCH_ENTITY_ID") {
            self.trigger.entity_id = val;
        }
        if let Ok(val) = std::env::var("HUBWATCH_FROM_STATE") {
            self.trigger.from_state = val;
        }
        if let Ok(val) = std::env::var("HUBWATCH_TO_STATE") {
            self.trigger.to_state = val;
        }
        if let Ok(val) = std::env::var("HUBWATCH_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.trigger_config().validate()?;
        Ok(())
    }

    /// Assemble the client-facing trigger configuration.
    #[must_use]
    pub fn trigger_config(&self) -> TriggerConfig {
        TriggerConfig {
            ws_url: self.hub.ws_url.clone(),
            event_type: self.trigger.event_type.clone(),
            entity_id: self.trigger.entity_id.clone(),
            from_state: self.trigger.from_state.clone(),
            to_state: self.trigger.to_state.clone(),
            include_event_data: self.trigger.include_event_data,
        }
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            ws_url: "ws://localhost:8123/api/websocket".to_string(),
            token_env: "HUBWATCH_TOKEN".to_string(),
        }
    }
}

impl Default for TriggerSection {
    fn default() -> Self {
        Self {
            event_type: "state_changed".to_string(),
            entity_id: String::new(),
            from_state: String::new(),
            to_state: String::new(),
            include_event_data: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "hubwatchd=info,hubwatch_client=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration")]
    Invalid(#[from] hubwatch_domain::error::ConfigError),
}
