//! Error types for the hepan library.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, content, parse, and input validation errors.
//! None of these are retried by the library.

use std::fmt;
use thiserror::Error;

/// The unified error type for hepan operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, HTTP status).
    ///
    /// Always potentially transient.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (rejected login, lockout, token exchange).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The forum answered, but not with the expected success contract.
    #[error("forum error: {0}")]
    Content(#[from] ContentError),

    /// An expected structural element was absent from a response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Input validation errors (bad forum URL, unknown ranking view).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns the server message if this is a [`ContentError`].
    pub fn content_message(&self) -> Option<&str> {
        match self {
            Error::Content(err) => Some(&err.message),
            _ => None,
        }
    }

    /// Whether the failure happened on the wire and may succeed later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// The server answered with a non-success status.
    #[error("HTTP status {status}")]
    Status { status: u16 },

    /// Generic HTTP error (body decoding, redirect loops, ...).
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout {
                message: err.to_string(),
            }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            TransportError::Status {
                status: status.as_u16(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The forum rejected the credentials. Carries the raw server text.
    #[error("login rejected: {message}")]
    Rejected { message: String },

    /// Too many failed attempts; the account is temporarily locked.
    #[error("account locked out: {message}")]
    LockedOut { message: String },

    /// The token exchange endpoint answered with a non-success status.
    #[error("token exchange failed with HTTP {status}")]
    ExchangeStatus { status: u16 },

    /// The token exchange body was not the expected JSON shape.
    #[error("token exchange returned malformed body: {reason}")]
    ExchangeMalformed { reason: String },

    /// The token exchange body had no `data.authorization` field.
    #[error("token exchange response has no authorization")]
    ExchangeMissingToken,

    /// A JSON API call was attempted without a bearer token.
    #[error("not authenticated; login first")]
    NotAuthenticated,
}

/// The forum answered but reported failure.
///
/// `message` is the server's own text, unmodified, so callers can log or
/// inspect it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentError {
    /// JSON API `code` field, if the failure came from the JSON family.
    pub code: Option<i64>,
    /// Message from the server.
    pub message: String,
    /// What the request was about (e.g. `tid=123`).
    pub context: Option<String>,
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = self.code {
            write!(f, "[{}] ", code)?;
        }
        write!(f, "{}", self.message)?;
        if let Some(ref context) = self.context {
            write!(f, " ({})", context)?;
        }
        Ok(())
    }
}

impl std::error::Error for ContentError {}

impl ContentError {
    /// Create a content error from an HTML response body.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            context: None,
        }
    }

    /// Create a content error from a JSON API envelope.
    pub fn api(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
            context: None,
        }
    }

    /// Attach request context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Structural errors raised by extraction adapters.
#[derive(Debug, Error)]
pub enum ParseError {
    /// An element the adapter relies on was not found.
    #[error("missing element: {what}")]
    MissingElement { what: String },

    /// An element was found but its value could not be interpreted.
    #[error("invalid value for {what}: {value:?}")]
    InvalidValue { what: String, value: String },

    /// A JSON payload did not match the expected shape.
    #[error("unexpected JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ParseError {
    pub(crate) fn missing(what: impl Into<String>) -> Self {
        Self::MissingElement { what: what.into() }
    }

    pub(crate) fn invalid(what: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            what: what.into(),
            value: value.into(),
        }
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid forum URL.
    #[error("invalid forum URL '{value}': {reason}")]
    ForumUrl { value: String, reason: String },

    /// Unknown variant name for a ranking view or task mode.
    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    /// Malformed numeric id.
    #[error("invalid id '{value}'")]
    Id { value: String },

    /// Page numbers start at 1.
    #[error("invalid page number {page}")]
    Page { page: u32 },

    /// Failed to build the HTTP client.
    #[error("cannot build HTTP client: {message}")]
    Client { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_error_keeps_server_message() {
        let err: Error = ContentError::api(1, "no permission").into();
        assert_eq!(err.content_message(), Some("no permission"));
        assert!(!err.is_transient());
    }

    #[test]
    fn content_error_display_includes_code_and_context() {
        let err = ContentError::api(3, "thread deleted").with_context("tid=42");
        assert_eq!(err.to_string(), "[3] thread deleted (tid=42)");
    }

    #[test]
    fn html_content_error_display_is_bare_message() {
        let err = ContentError::new("formhash expired");
        assert_eq!(err.to_string(), "formhash expired");
    }
}
