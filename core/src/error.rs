use std::fmt;

use http::StatusCode;
use thiserror::Error;

/// The error type for all client operations.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    code: Option<String>,
    status: Option<StatusCode>,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required argument is missing or inconsistent. Raised locally,
    /// before any request is built or sent.
    Validation,

    /// The service answered with an error document. Carries the service's
    /// error code string and the HTTP status.
    Provider,

    /// The response had an unexpected shape: a non-2xx status without a
    /// parseable error body, or a 2xx body that failed to decode.
    Protocol,

    /// The transport collaborator failed (DNS, connection, TLS).
    Transport,
}

impl Error {
    /// Create a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            status: None,
            source: None,
        }
    }

    /// Add a source error.
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach the HTTP status the error was observed with.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The service's error code string, present on `Provider` errors.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// The HTTP status of the failed exchange, if one took place.
    pub fn http_status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Whether a caller building retry logic should consider this error
    /// retryable. Only provider codes signaling throttling or an
    /// optimistic-concurrency conflict qualify; validation and protocol
    /// errors are contract bugs and never retryable.
    pub fn is_retryable(&self) -> bool {
        self.kind == ErrorKind::Provider
            && matches!(
                self.code.as_deref(),
                Some("Throttling") | Some("PreconditionFailed") | Some("InvalidIfMatchVersion")
            )
    }
}

// Convenience constructors
impl Error {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a provider error from a decoded error document.
    pub fn provider(
        status: StatusCode,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let mut err = Self::new(ErrorKind::Provider, message);
        err.code = Some(code.into());
        err.status = Some(status);
        err
    }

    /// Create a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Protocol, message)
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "invalid argument"),
            ErrorKind::Provider => write!(f, "service error"),
            ErrorKind::Protocol => write!(f, "unexpected response"),
            ErrorKind::Transport => write!(f, "transport failure"),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::validation(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::validation(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::validation(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
