//! Error handling for catalog API operations.

use http::{Method, StatusCode};
use thiserror::Error;

use crate::entity::{EntityKind, UnknownKindError};

/// Error returned when a response carries any status other than the one
/// success code expected by the operation.
///
/// The response body is discarded, only the status survives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status}")]
pub struct StatusError {
    /// Status line of the response, e.g. `404 Not Found`.
    pub status: String,
    /// Numeric status code of the response.
    pub code: StatusCode,
}

impl StatusError {
    /// `reason` is the reason phrase sent by the server, if any. Without one
    /// the canonical phrase of the code is used, and for unregistered codes
    /// the status line is the bare code.
    pub(crate) fn new(code: StatusCode, reason: Option<&str>) -> Self {
        let reason = reason
            .map(str::trim)
            .filter(|reason| !reason.is_empty())
            .or_else(|| code.canonical_reason());
        let status = match reason {
            Some(reason) => format!("{} {reason}", code.as_str()),
            None => code.as_str().to_string(),
        };
        Self { status, code }
    }
}

/// Errors raised while turning response bodies or entity documents into
/// typed values.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),

    /// The entity is of another kind than the requested spec shape.
    /// `actual` is the kind as sent, which may be outside [EntityKind].
    #[error("expected entity of kind '{expected}', found '{actual}'")]
    KindMismatch { expected: EntityKind, actual: String },

    /// The document has no `kind`, e.g. because it was left out by a
    /// field selection.
    #[error("entity has no kind")]
    MissingKind,

    #[error("no spec shape for entity kind")]
    UnknownKind(#[from] UnknownKindError),

    #[error("invalid URL '{url}' in 'Link' header")]
    LinkUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Common error type for catalog API operations.
#[derive(Debug, Error)]
pub enum CatalogClientError {
    #[error("invalid catalog URL '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Empty and dot segments would be dropped or resolved when the URL is
    /// normalized, so they can't address an entity.
    #[error("invalid {parameter} '{value}' for a URL path segment")]
    InvalidPathParameter {
        parameter: &'static str,
        value: String,
    },

    #[error("invalid header '{name}'")]
    InvalidHeader { name: String },

    #[error("could not build HTTP client")]
    Build(#[source] reqwest::Error),

    #[error("could not load catalog client configuration")]
    Config(#[from] config::ConfigError),

    /// The request never produced a response:
    /// DNS, connection, timeout or body read failures.
    #[error("{method} {path}: request failed")]
    Transport {
        method: Method,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {path}: {status}")]
    Status {
        method: Method,
        path: String,
        status: StatusError,
    },

    #[error("{method} {path}: could not decode response")]
    Decode {
        method: Method,
        path: String,
        #[source]
        source: DecodeError,
    },
}

impl CatalogClientError {
    /// The status error, if the server answered with an unexpected status.
    pub fn status_error(&self) -> Option<&StatusError> {
        match self {
            CatalogClientError::Status { status, .. } => Some(status),
            _ => None,
        }
    }

    /// Shorthand for branching on e.g. `404` vs `500`.
    pub fn status_code(&self) -> Option<StatusCode> {
        self.status_error().map(|status| status.code)
    }

    /// Whether the request was aborted because a timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, CatalogClientError::Transport { source, .. } if source.is_timeout())
    }
}
