//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound connection (axum, one task per connection)
//!     → server.rs (router, tracing layer)
//!     → handler.rs (method check, fetch)
//!     → target.rs (request-target → outbound URI, never rewritten)
//!     → upstream.rs (GET over HTTP/HTTPS, follow redirects)
//!     → response.rs (status + headers + CORS header)
//!     → body.rs (stream upstream body downstream)
//! ```

pub mod body;
pub mod handler;
pub mod response;
pub mod server;
pub mod target;
pub mod upstream;

pub use server::{AppState, RelayServer};
