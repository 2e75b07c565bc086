//! Configuration error types.

/// Errors produced while validating or expanding a trigger configuration.
///
/// All variants are user-input problems and are surfaced before any
/// connection attempt is made.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The websocket url is missing or blank.
    #[error("websocket url must not be empty")]
    MissingUrl,

    /// The event type is missing or blank.
    #[error("event type must not be empty")]
    MissingEventType,

    /// A conditional trigger subscription was requested without any
    /// entity ids to scope it to.
    #[error("trigger subscriptions require at least one entity id")]
    MissingEntityIds,

    /// No usable credential was supplied.
    #[error("credential is missing or blank")]
    MissingCredential,
}
