//! The forwarding handler.
//!
//! Every inbound request takes the same linear path:
//! discard body → require GET → derive target → fetch → relay.
//! Two early exits: 405 for any other method, 500 when the target cannot
//! be fetched. Nothing is retried.

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    response::Response,
};

use crate::error::RelayError;
use crate::http::server::AppState;
use crate::http::{response, target};

pub async fn relay_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Result<Response, RelayError> {
    let (parts, body) = request.into_parts();
    // Request bodies are never forwarded.
    drop(body);

    if parts.method != Method::GET {
        tracing::info!(method = %parts.method, "Rejected non-GET request");
        return Err(RelayError::MethodNotAllowed);
    }

    let target = target::derive(&parts.uri).inspect_err(|e| {
        tracing::warn!(error = %e, "Invalid target URL");
    })?;

    tracing::debug!(target_url = %target, "Fetching upstream");

    let (final_target, upstream) = state
        .upstream
        .fetch(target.clone())
        .await
        .map_err(|source| RelayError::Upstream {
            target: target.to_string(),
            source,
        })
        .inspect_err(|e| {
            tracing::warn!(error = %e, "Upstream fetch failed");
        })?;

    tracing::info!(
        target_url = %final_target,
        status = upstream.status().as_u16(),
        "Relaying upstream response"
    );

    Ok(response::relay(final_target, upstream))
}
