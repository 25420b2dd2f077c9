//! Error module
use std::fmt;
use thiserror::Error;

use crate::connector::HandleState;

#[derive(Debug, Error)]
/// The error type for configuration, connection and statement failures. The
/// kind is shared across backends; the original code and message are whatever
/// the native library reported.
pub struct Error {
    kind: ErrorKind,
    original_code: Option<String>,
    original_message: Option<String>,
}

pub(crate) struct ErrorBuilder {
    kind: ErrorKind,
    original_code: Option<String>,
    original_message: Option<String>,
}

impl ErrorBuilder {
    pub(crate) fn set_original_code(&mut self, code: impl Into<String>) -> &mut Self {
        self.original_code = Some(code.into());
        self
    }

    pub(crate) fn set_original_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.original_message = Some(message.into());
        self
    }

    pub(crate) fn build(self) -> Error {
        Error {
            kind: self.kind,
            original_code: self.original_code,
            original_message: self.original_message,
        }
    }
}

impl Error {
    pub(crate) fn builder(kind: ErrorKind) -> ErrorBuilder {
        ErrorBuilder {
            kind,
            original_code: None,
            original_message: None,
        }
    }

    /// The error code sent by the database, if available.
    pub fn original_code(&self) -> Option<&str> {
        self.original_code.as_deref()
    }

    /// The original error message sent by the database, if available.
    pub fn original_message(&self) -> Option<&str> {
        self.original_message.as_deref()
    }

    /// A more specific error type for matching.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Keeps the native code and message, swapping the kind.
    pub(crate) fn with_kind(self, kind: ErrorKind) -> Self {
        Self { kind, ..self }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::builder(kind).build()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("Invalid connection configuration: {}", _0)]
    ConfigInvalid(String),

    #[error("Authentication failed for user '{}'", user)]
    AuthFailed { user: String },

    #[error("Can't reach database server at '{}'", host)]
    Unreachable { host: String },

    #[error("The database server rejected the session protocol")]
    ProtocolError,

    #[error("Operation not allowed, the connection is {}", state)]
    InvalidState { state: HandleState },

    #[error("The statement could not be parsed or refers to unknown objects")]
    SyntaxError,

    #[error("Constraint failed: {}", constraint.as_deref().unwrap_or("(not available)"))]
    ConstraintViolation { constraint: Option<String> },

    #[error("The connection to the database server was lost")]
    ConnectionLost,

    #[error("Operation timed out")]
    Timeout,

    #[error("Error fetching from the result cursor")]
    CursorError,

    #[error("Error querying the database")]
    Unknown,
}

impl ErrorKind {
    pub(crate) fn config_invalid(msg: impl Into<String>) -> Self {
        Self::ConfigInvalid(msg.into())
    }

    /// The taxonomy name of the kind, stable across releases.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ConfigInvalid(_) => "ConfigInvalid",
            Self::AuthFailed { .. } => "AuthFailed",
            Self::Unreachable { .. } => "Unreachable",
            Self::ProtocolError => "ProtocolError",
            Self::InvalidState { .. } => "InvalidState",
            Self::SyntaxError => "SyntaxError",
            Self::ConstraintViolation { .. } => "ConstraintViolation",
            Self::ConnectionLost => "ConnectionLost",
            Self::Timeout => "Timeout",
            Self::CursorError => "CursorError",
            Self::Unknown => "Unknown",
        }
    }

    /// True for the kinds an `open` attempt can fail with after validation.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::AuthFailed { .. } | Self::Unreachable { .. } | Self::ProtocolError
        )
    }
}

impl From<Error> for ErrorKind {
    fn from(e: Error) -> Self {
        e.kind
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Error {
        let kind = ErrorKind::config_invalid(e.to_string());
        Error::builder(kind).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shows_the_kind_message() {
        let mut builder = Error::builder(ErrorKind::ConstraintViolation {
            constraint: Some("SCOTT.PK_EMP".into()),
        });
        builder.set_original_code("ORA-00001");
        builder.set_original_message("ORA-00001: unique constraint (SCOTT.PK_EMP) violated");

        let err = builder.build();

        assert_eq!("Constraint failed: SCOTT.PK_EMP", err.to_string());
        assert_eq!(Some("ORA-00001"), err.original_code());
        assert_eq!("ConstraintViolation", err.kind().name());
    }

    #[test]
    fn with_kind_keeps_native_details() {
        let mut builder = Error::builder(ErrorKind::ConnectionLost);
        builder.set_original_code("20047");
        builder.set_original_message("DBPROCESS is dead or not enabled");

        let err = builder.build().with_kind(ErrorKind::CursorError);

        assert_eq!(&ErrorKind::CursorError, err.kind());
        assert_eq!(Some("20047"), err.original_code());
        assert_eq!(Some("DBPROCESS is dead or not enabled"), err.original_message());
    }

    #[test]
    fn url_errors_are_config_errors() {
        let err = Error::from(url::ParseError::EmptyHost);
        assert!(matches!(err.kind(), ErrorKind::ConfigInvalid(_)));
    }
}
