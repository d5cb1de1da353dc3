//! Streaming body relay.
//!
//! `RelayBody` hands upstream chunks to the downstream connection as they
//! arrive. At most one chunk is held at a time. It owns the upstream body,
//! so dropping it (clean finish, copy error, or the client going away)
//! releases the upstream connection.

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{StatusCode, Uri};
use bytes::Bytes;
use futures_util::stream::{BoxStream, Stream, StreamExt};
use hyper::body::Incoming;

pub struct RelayBody {
    inner: BoxStream<'static, Result<Bytes, axum::Error>>,
    target: Uri,
    bytes_copied: u64,
    finished: bool,
}

/// 1xx, 204 and 304 responses never carry a body, and the server never
/// polls one for them.
pub fn status_allows_body(status: StatusCode) -> bool {
    !(status.is_informational()
        || status == StatusCode::NO_CONTENT
        || status == StatusCode::NOT_MODIFIED)
}

impl RelayBody {
    pub fn new(target: Uri, status: StatusCode, upstream: Incoming) -> Self {
        Self::from_stream(target, status, Body::new(upstream).into_data_stream())
    }

    pub fn from_stream<S>(target: Uri, status: StatusCode, stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, axum::Error>> + Send + 'static,
    {
        Self {
            inner: stream.boxed(),
            target,
            bytes_copied: 0,
            finished: !status_allows_body(status),
        }
    }

    /// Bytes handed downstream so far.
    pub fn bytes_copied(&self) -> u64 {
        self.bytes_copied
    }

    /// Whether the copy reached an end (upstream EOF, upstream error, or a
    /// status without a body).
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Stream for RelayBody {
    type Item = Result<Bytes, axum::Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        if this.finished {
            return Poll::Ready(None);
        }

        match this.inner.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.bytes_copied += chunk.len() as u64;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.finished = true;
                tracing::warn!(
                    target_url = %this.target,
                    bytes_copied = this.bytes_copied,
                    error = %e,
                    "Error copying response body"
                );
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.finished = true;
                tracing::debug!(
                    target_url = %this.target,
                    bytes_copied = this.bytes_copied,
                    "Response body copied"
                );
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for RelayBody {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!(
                target_url = %self.target,
                bytes_copied = self.bytes_copied,
                "Error copying response body: client went away"
            );
        }
    }
}
