use thiserror::Error;

/// Errors returned by the assistant chat-completion client.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured endpoint could not be parsed into a completions URL.
    /// Surfaces at startup, never during a query.
    #[error("invalid assistant endpoint '{0}'")]
    InvalidEndpoint(String),

    /// The assistant endpoint returned a non-2xx status.
    #[error("assistant returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The completion body could not be parsed into the expected shape.
    #[error("invalid completion response for {context}: {reason}")]
    InvalidResponse { context: String, reason: String },
}
