//! Configuration schema definitions.

use std::net::{Ipv4Addr, SocketAddr};

use crate::config::cli::Cli;

/// Port used when none is given on the command line.
pub const DEFAULT_PORT: u16 = 8080;

/// Root configuration for the relay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,
}

impl RelayConfig {
    /// Configuration listening on all interfaces at `port`.
    pub fn with_port(port: u16) -> Self {
        Self {
            listener: ListenerConfig::all_interfaces(port),
        }
    }
}

impl From<Cli> for RelayConfig {
    fn from(cli: Cli) -> Self {
        Self::with_port(cli.port)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    /// Bind address (e.g., 0.0.0.0:8080).
    pub bind_address: SocketAddr,
}

impl ListenerConfig {
    pub fn all_interfaces(port: u16) -> Self {
        Self {
            bind_address: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
        }
    }

    pub fn port(&self) -> u16 {
        self.bind_address.port()
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self::all_interfaces(DEFAULT_PORT)
    }
}
