//! Error types for helpdesk-bot.

/// Top-level error type for the bot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("State store error: {0}")]
    Store(#[from] StoreError),

    #[error("Intent classification error: {0}")]
    Nlu(#[from] NluError),

    #[error("Knowledge base error: {0}")]
    Kb(#[from] KbError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Session store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Intent classifier collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum NluError {
    #[error("Classification request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid classification response: {0}")]
    InvalidResponse(String),
}

/// Knowledge-base collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum KbError {
    #[error("Lookup request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid lookup response: {0}")]
    InvalidResponse(String),
}

/// Outbound delivery errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Failed to send activity: {0}")]
    SendFailed(String),

    #[error("Channel authentication failed: {0}")]
    AuthFailed(String),
}

/// Result type alias for the bot.
pub type Result<T> = std::result::Result<T, Error>;
