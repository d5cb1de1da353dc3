//! Error types.
//!
//! `RelayError` ends a single request and becomes a plain-text response.
//! `Error` ends the process.

use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::http::response::plain_text;
use crate::http::target::TargetError;
use crate::http::upstream::FetchError;
use crate::net::ListenerError;

/// Text returned to callers that use any method other than GET.
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Only 'GET' requests are permitted.";

/// Failure while handling one relayed request.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("{}", METHOD_NOT_ALLOWED_MESSAGE)]
    MethodNotAllowed,

    /// The request path did not carry an absolute URL.
    #[error("Get {target:?}: {source}")]
    InvalidTarget {
        target: String,
        #[source]
        source: TargetError,
    },

    /// The outbound fetch failed before a response arrived.
    #[error("Get {target:?}: {}", error_chain(.source))]
    Upstream {
        target: String,
        #[source]
        source: FetchError,
    },
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::InvalidTarget { .. } | RelayError::Upstream { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        plain_text(self.status(), &self.to_string())
    }
}

/// Process-level failure. Any of these is fatal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("Error while serving: {0}")]
    Serve(#[source] std::io::Error),
}

/// Render an error and all of its sources as `outer: inner: innermost`.
pub fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // Some wrappers already repeat their source in their own message.
        if !rendered.ends_with(&text) {
            rendered.push_str(": ");
            rendered.push_str(&text);
        }
        source = cause.source();
    }
    rendered
}
