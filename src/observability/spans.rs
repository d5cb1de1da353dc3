//! Per-request spans.

use axum::{body::Body, http::Request};
use tracing::Span;
use uuid::Uuid;

/// Span for one inbound request. The request id only lives in logs; it is
/// never added to the relayed response.
pub fn make_request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "relay",
        request_id = %Uuid::new_v4(),
        method = %request.method(),
        uri = %request.uri(),
    )
}

