//! Outbound target derivation.
//!
//! The inbound request-target is the outbound URL with one `/` in front of
//! it: `GET /https://example.com/data.json` fetches
//! `https://example.com/data.json`. The remainder is kept as an
//! `http::Uri`, which neither decodes nor normalizes, so dot segments and
//! percent escapes reach upstream exactly as the caller wrote them. Any
//! host is accepted, private addresses included.

use axum::http::uri::{InvalidUri, Scheme};
use axum::http::Uri;

use crate::error::RelayError;

/// Why a string cannot be fetched.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error("unsupported protocol scheme {0:?}")]
    UnsupportedScheme(String),

    #[error("no Host in request URL")]
    MissingHost,

    #[error(transparent)]
    Invalid(#[from] InvalidUri),
}

/// The request-target exactly as the client sent it.
///
/// Origin-form requests yield path plus query; absolute-form requests
/// (sent by clients configured to use this as a forward proxy) yield the
/// whole URI.
pub fn request_target(uri: &Uri) -> String {
    if uri.scheme().is_some() {
        return uri.to_string();
    }
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// Remove exactly one leading `/`.
pub fn strip_separator(raw: &str) -> &str {
    raw.strip_prefix('/').unwrap_or(raw)
}

/// Parse an absolute `http`/`https` URI without rewriting it.
pub fn parse(raw: &str) -> Result<Uri, TargetError> {
    if raw.is_empty() {
        return Err(TargetError::UnsupportedScheme(String::new()));
    }
    let uri: Uri = raw.parse()?;

    match uri.scheme() {
        Some(scheme) if *scheme == Scheme::HTTP || *scheme == Scheme::HTTPS => {}
        Some(scheme) => return Err(TargetError::UnsupportedScheme(scheme.to_string())),
        None => return Err(TargetError::UnsupportedScheme(String::new())),
    }

    match uri.host() {
        Some(host) if !host.is_empty() => Ok(uri),
        _ => Err(TargetError::MissingHost),
    }
}

/// Derive the outbound URI for an inbound request.
pub fn derive(uri: &Uri) -> Result<Uri, RelayError> {
    let raw = request_target(uri);
    let target = strip_separator(&raw);
    parse(target).map_err(|source| RelayError::InvalidTarget {
        target: target.to_string(),
        source,
    })
}
