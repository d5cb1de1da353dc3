//! Response construction.
//!
//! # Responsibilities
//! - Copy upstream headers onto the relayed response, every value in order
//! - Append the wildcard CORS header, even when upstream already sent one
//! - Build the plain-text responses for locally detected failures

use axum::body::Body;
use axum::http::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS,
};
use axum::http::{StatusCode, Uri};
use axum::response::Response;
use hyper::body::Incoming;

use crate::http::body::RelayBody;

/// Headers for the relayed response: upstream's, then `Access-Control-Allow-Origin: *`.
pub fn relay_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(upstream.len() + 1);
    for (name, value) in upstream {
        headers.append(name.clone(), value.clone());
    }
    headers.append(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers
}

/// Turn an upstream response into the response for the original caller.
///
/// Status and headers are committed here; the body is streamed afterwards.
pub fn relay(target: Uri, upstream: axum::http::Response<Incoming>) -> Response {
    let (parts, incoming) = upstream.into_parts();
    let status = parts.status;
    let headers = relay_headers(&parts.headers);
    let body = RelayBody::new(target, status, incoming);

    let mut response = Response::new(Body::from_stream(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// A short plain-text response, newline terminated.
pub fn plain_text(status: StatusCode, message: &str) -> Response {
    let mut response = Response::new(Body::from(format!("{}\n", message)));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    response
}
