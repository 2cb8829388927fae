use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by the service alongside a JSON content type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Structured error context for configuration and request-building failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "endpoint", "burst_size")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected range, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "configuration", "request_builder")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Discriminant of [`Error`], for callers that branch on the cause of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 401: credentials missing or rejected; re-authenticate.
    Unauthorized,
    /// 403: authenticated but not permitted.
    Forbidden,
    /// Any other status >= 400, or a success status carrying an error payload.
    Server,
    /// A final response that was neither 2xx nor an error status.
    Unclassified,
    /// The exchange never completed (connect, send or body read failed).
    Transport,
    /// The response arrived but could not be decoded into the requested shape.
    Decode,
    /// The request payload could not be serialized.
    Serialization,
    /// Invalid configuration or request parameters.
    Configuration,
}

/// Unified error type for the client.
///
/// The three status-classified variants (`Unauthorized`, `Forbidden`, `Server`)
/// share the same fields; [`Error::is_server_error`] treats them as one family.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{}", format_status(.status, .reason, .payload))]
    Unauthorized {
        status: u16,
        reason: String,
        payload: Option<ErrorResponse>,
    },

    #[error("{}", format_status(.status, .reason, .payload))]
    Forbidden {
        status: u16,
        reason: String,
        payload: Option<ErrorResponse>,
    },

    #[error("{}", format_status(.status, .reason, .payload))]
    Server {
        status: u16,
        reason: String,
        payload: Option<ErrorResponse>,
    },

    #[error("Unexpected HTTP status {status}: {reason}")]
    UnexpectedStatus { status: u16, reason: String },

    #[error("Network transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),

    #[error("Failed to decode response body (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },
}

fn format_status(status: &u16, reason: &str, payload: &Option<ErrorResponse>) -> String {
    match payload.as_ref().and_then(ErrorResponse::message) {
        Some(message) => format!("{}: {} - {}", status, reason, message),
        None => format!("{}: {}", status, reason),
    }
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Unauthorized { .. } => ErrorKind::Unauthorized,
            Error::Forbidden { .. } => ErrorKind::Forbidden,
            Error::Server { .. } => ErrorKind::Server,
            Error::UnexpectedStatus { .. } => ErrorKind::Unclassified,
            Error::Transport(_) => ErrorKind::Transport,
            Error::Decode { .. } => ErrorKind::Decode,
            Error::Serialization(_) => ErrorKind::Serialization,
            Error::Configuration { .. } => ErrorKind::Configuration,
        }
    }

    /// True for failures the remote service reported (401, 403, other error statuses).
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Error::Unauthorized { .. } | Error::Forbidden { .. } | Error::Server { .. }
        )
    }

    /// HTTP status of the response that produced this error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Unauthorized { status, .. }
            | Error::Forbidden { status, .. }
            | Error::Server { status, .. }
            | Error::UnexpectedStatus { status, .. }
            | Error::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Error::Unauthorized { reason, .. }
            | Error::Forbidden { reason, .. }
            | Error::Server { reason, .. }
            | Error::UnexpectedStatus { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// Parsed error body, present only when the server answered with JSON.
    pub fn payload(&self) -> Option<&ErrorResponse> {
        match self {
            Error::Unauthorized { payload, .. }
            | Error::Forbidden { payload, .. }
            | Error::Server { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}
