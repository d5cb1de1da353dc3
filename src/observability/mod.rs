//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! main.rs
//!     → logging.rs (install subscriber once at startup)
//! http::server
//!     → spans.rs (one span per request, tagged with a request id)
//! ```

pub mod logging;
pub mod spans;
