//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Process start
//!     → listener.rs (bind all interfaces on the configured port)
//!     → Hand off to HTTP layer (axum accepts and spawns per connection)
//! ```

pub mod listener;

pub use listener::{bind, ListenerError};
