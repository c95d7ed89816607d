//! Error types for the Foursquare API client.
//!
//! # Design
//! One crate-level `Error` covers the whole build/execute/parse pipeline.
//! Server-signaled failures arrive in several legacy shapes; the normalizer
//! folds all of them into `Error::Api`, so callers match on a single variant
//! no matter which API version produced the body. Transport and parse
//! failures keep their own enums because callers branch on their kinds
//! (timeout vs. connection, array vs. object mismatch).

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by `FoursquareClient` builders, `ApiCall::parse` and
/// `Foursquare::execute`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response body is not valid JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// The server signaled a failure in the body.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The server rejected the caller's credentials (HTTP 401 or an
    /// `unauthorized` body).
    #[error("credentials rejected: {0}")]
    Credentials(String),

    /// An OAuth token exchange was attempted in a state that forbids it.
    #[error("illegal credential state: {0}")]
    CredentialState(String),

    /// The JSON was well-formed but did not have the shape the parser needs.
    #[error("response shape mismatch: {0}")]
    Parse(#[from] ParseError),

    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// Any other non-200 status whose body carried no recognised error.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The upload image could not be read. `path` is absent for readers.
    #[error("failed to read upload source: {source}")]
    Upload {
        path: Option<PathBuf>,
        source: std::io::Error,
    },
}

/// A server-signaled failure. Any part may be missing: the legacy error
/// shapes carry a message, a type tag, a numeric code, or some subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub message: String,
    pub kind: Option<String>,
    pub code: Option<i64>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: None,
            code: None,
        }
    }

    pub fn with_kind(mut self, kind: Option<String>) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_code(mut self, code: Option<i64>) -> Self {
        self.code = code;
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error: {}", self.message)?;
        if let Some(kind) = &self.kind {
            write!(f, " (type {kind})")?;
        }
        if let Some(code) = self.code {
            write!(f, " (code {code})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Failures raised by a `Transport` before any response body is available.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    /// A non-timeout socket failure while streaming an upload.
    #[error("socket error during upload: {0}")]
    Socket(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raised by parsers when the JSON does not match the expected shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A parser with no collection form was handed a JSON array.
    #[error("{parser} parser has no array form")]
    UnsupportedArray { parser: &'static str },

    #[error("{parser} parser expected an object or array, found {found}")]
    UnexpectedShape {
        parser: &'static str,
        found: &'static str,
    },

    #[error("field `{field}` is not {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
