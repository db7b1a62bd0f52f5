//! Error types for rally-wsapi-client.

/// Result type alias for rally-wsapi-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for rally-wsapi-client operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Shorthand for a logical failure carrying the envelope's `Errors`.
    pub fn wsapi(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self::new(ErrorKind::Wsapi { errors, warnings })
    }

    /// The error as a list of messages.
    ///
    /// Logical failures return the envelope's `Errors` verbatim. Every other
    /// kind is a single-element list holding its message.
    pub fn errors(&self) -> Vec<String> {
        match &self.kind {
            ErrorKind::Wsapi { errors, .. } => errors.clone(),
            other => vec![other.to_string()],
        }
    }

    /// Returns true if the service answered with a non-empty `Errors` list.
    pub fn is_wsapi(&self) -> bool {
        matches!(self.kind, ErrorKind::Wsapi { .. })
    }

    /// Returns true if the failure happened before any envelope was seen.
    pub fn is_transport(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Transport(_) | ErrorKind::Timeout | ErrorKind::Connection(_)
        )
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The service reported errors inside the response envelope.
    #[error("WSAPI error: {}", errors.join("; "))]
    Wsapi {
        errors: Vec<String>,
        warnings: Vec<String>,
    },

    /// HTTP transport failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Response body was not a JSON object.
    #[error("{url}: {status}! body={body}")]
    InvalidResponse {
        url: String,
        status: u16,
        body: String,
    },

    /// JSON object without a `Result` or `OperationResult` key.
    #[error("Unrecognized response envelope (status {status}, keys: {})", keys.join(", "))]
    UnrecognizedEnvelope { status: u16, keys: Vec<String> },

    /// The authorize call succeeded but carried no `SecurityToken`.
    #[error("Security token missing from authorize response")]
    MissingSecurityToken,

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No async runtime to drive the request, or the driving task died.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else if err.is_builder() {
            ErrorKind::Config(err.to_string())
        } else {
            ErrorKind::Transport(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::Config(format!("Invalid URL: {}", err)), err)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        let message = if err.is_panic() {
            "request task panicked".to_string()
        } else {
            "request task was cancelled".to_string()
        };
        Error::with_source(ErrorKind::Runtime(message), err)
    }
}
