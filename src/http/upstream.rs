//! Outbound fetch.
//!
//! # Responsibilities
//! - Issue a bodiless GET for the derived target, over HTTP or HTTPS
//! - Send the target's path and query exactly as given
//! - Follow redirects like a default browser-style client (at most 10)
//!
//! No timeout is applied and nothing is retried. The client's connection
//! pool is the only state shared between requests.

use axum::body::Body;
use axum::http::header::LOCATION;
use axum::http::{Request, Response, StatusCode, Uri};
use hyper::body::Incoming;
use hyper_tls::HttpsConnector;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::http::target::{self, TargetError};

/// Redirect hops followed before giving up.
pub const MAX_REDIRECTS: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Request(#[from] hyper_util::client::legacy::Error),

    #[error(transparent)]
    Build(#[from] axum::http::Error),

    #[error("stopped after {} redirects", MAX_REDIRECTS)]
    TooManyRedirects,

    #[error("failed to resolve Location header {location:?}: {source}")]
    BadLocation {
        location: String,
        #[source]
        source: url::ParseError,
    },

    #[error("redirect to {location:?}: {source}")]
    BadRedirectTarget {
        location: String,
        #[source]
        source: TargetError,
    },
}

/// Shared outbound client.
#[derive(Clone)]
pub struct Upstream {
    client: Client<HttpsConnector<HttpConnector>, Body>,
}

impl Upstream {
    pub fn new() -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpsConnector::new());
        Self { client }
    }

    /// GET `target`, following redirects. Returns the final URI and the
    /// response whose body has not been read yet.
    pub async fn fetch(&self, target: Uri) -> Result<(Uri, Response<Incoming>), FetchError> {
        let mut uri = target;
        let mut redirects = 0;

        loop {
            let request = Request::get(uri.clone()).body(Body::empty())?;
            let response = self.client.request(request).await?;

            let Some(next) = redirect_target(&uri, &response)? else {
                return Ok((uri, response));
            };
            if redirects == MAX_REDIRECTS {
                return Err(FetchError::TooManyRedirects);
            }
            redirects += 1;

            tracing::debug!(from = %uri, to = %next, hop = redirects, "Following redirect");
            uri = next;
        }
    }
}

impl Default for Upstream {
    fn default() -> Self {
        Self::new()
    }
}

fn is_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

/// Where a redirect response points, resolved against `base`.
/// A redirect status without `Location` is returned to the caller as is.
fn redirect_target<B>(base: &Uri, response: &Response<B>) -> Result<Option<Uri>, FetchError> {
    if !is_redirect(response.status()) {
        return Ok(None);
    }
    let Some(location) = response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
    else {
        return Ok(None);
    };

    let resolved = url::Url::parse(&base.to_string())
        .and_then(|base| base.join(location))
        .map_err(|source| FetchError::BadLocation {
            location: location.to_string(),
            source,
        })?;

    target::parse(resolved.as_str())
        .map(Some)
        .map_err(|source| FetchError::BadRedirectTarget {
            location: location.to_string(),
            source,
        })
}
