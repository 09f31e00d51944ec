/// Core error type for the SD Elements tool layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The API client could not be built (missing or invalid host/credentials).
    #[error("configuration error: {0}")]
    Config(String),

    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),
}

impl Error {
    /// Whether the error was caused by the caller's input rather than the backend.
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidArguments(_) | Self::UnknownTool(_))
    }
}
