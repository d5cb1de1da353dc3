//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! command line (--port)
//!     → cli.rs (clap parse)
//!     → RelayConfig (resolved, immutable)
//!     → net::listener binds, http::server serves
//! ```
//!
//! The listen port is the only setting. There is no config file.

pub mod cli;
pub mod schema;

pub use cli::Cli;
pub use schema::{ListenerConfig, RelayConfig, DEFAULT_PORT};
