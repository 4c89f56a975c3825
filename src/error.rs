//! Error types for xmlbind
//!
//! This module defines the error type shared by the generic converter and the
//! typed binding service, together with the coarse [`ErrorKind`] used when an
//! error crosses the request boundary.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type alias using xmlbind Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xmlbind operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input is not well-formed XML
    #[error("malformed XML: {0}")]
    MalformedXml(#[from] ParseError),

    /// The type identifier does not name a registered bindable type
    #[error("target type not found: {0}")]
    TargetTypeNotFound(String),

    /// A binding context could not be built, or the XML does not fit the type
    #[error("binding error: {0}")]
    Binding(String),

    /// Name error (invalid XML name)
    #[error("name error: {0}")]
    Name(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Classify this error for the request boundary
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedXml(_) => ErrorKind::MalformedXml,
            Error::TargetTypeNotFound(_) => ErrorKind::TargetTypeNotFound,
            Error::Binding(_) => ErrorKind::BindingError,
            Error::Name(_)
            | Error::LimitExceeded(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::Other(_) => ErrorKind::UnexpectedError,
        }
    }

    /// Shorthand for a malformed XML error without location
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedXml(ParseError::new(message))
    }
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        Error::MalformedXml(err.into())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::malformed(err.to_string())
    }
}

impl From<quick_xml::de::DeError> for Error {
    fn from(err: quick_xml::de::DeError) -> Self {
        Error::Binding(err.to_string())
    }
}

/// Error classification surfaced to callers
///
/// Each kind maps to a distinct caller-visible response; the boundary never
/// folds one kind into another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// The input is not well-formed XML
    MalformedXml,
    /// The type identifier could not be resolved
    TargetTypeNotFound,
    /// The type could not be bound, or the XML does not match it
    BindingError,
    /// Anything else
    UnexpectedError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::MalformedXml => "MalformedXml",
            ErrorKind::TargetTypeNotFound => "TargetTypeNotFound",
            ErrorKind::BindingError => "BindingError",
            ErrorKind::UnexpectedError => "UnexpectedError",
        };
        f.write_str(name)
    }
}

/// XML parsing error
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Location in the input, as `row:col`
    pub location: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl From<roxmltree::Error> for ParseError {
    fn from(err: roxmltree::Error) -> Self {
        let pos = err.pos();
        ParseError::new(err.to_string()).with_location(format!("{}:{}", pos.row, pos.col))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, " (at {})", loc)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}
