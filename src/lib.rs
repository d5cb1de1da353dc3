//! CORS relay library.
//!
//! Fetches the URL embedded in the request path and returns the upstream
//! response with `Access-Control-Allow-Origin: *` appended, so browser
//! scripts can read resources whose origin sends no CORS headers.

pub mod config;
pub mod error;
pub mod http;
pub mod net;
pub mod observability;

pub use config::RelayConfig;
pub use error::{Error, RelayError};
pub use http::RelayServer;
