//! Command-line surface.

use clap::Parser;

use crate::config::schema::DEFAULT_PORT;

#[derive(Debug, Clone, Parser)]
#[command(name = "cors-relay")]
#[command(about = "Relays GET requests to the URL in the path and adds a permissive CORS header", long_about = None)]
pub struct Cli {
    /// The port to listen on
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
}
