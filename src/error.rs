//! Error types for BotBuilder.

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Chat store error: {0}")]
    Store(#[from] StoreError),

    #[error("WhatsApp connect error: {0}")]
    Connect(#[from] ConnectError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors from the backend REST API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request to {endpoint} failed: {reason}")]
    RequestFailed { endpoint: String, reason: String },

    #[error("{endpoint} returned {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the external chat-transcript store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store request failed: {0}")]
    RequestFailed(String),

    #[error("Store returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed stored chat: {0}")]
    Malformed(String),
}

/// Errors from the WhatsApp OAuth handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    /// The pending subscription was cancelled, replaced, or torn down
    /// before the connected signal arrived.
    #[error("Connection handshake was cancelled")]
    Cancelled,
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
