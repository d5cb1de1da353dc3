use std::process::ExitCode;

use clap::Parser;

use cors_relay::config::{Cli, RelayConfig};
use cors_relay::{net, observability, Error, RelayServer};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    observability::logging::init();

    match run(RelayConfig::from(cli)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Relay stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: RelayConfig) -> Result<(), Error> {
    tracing::info!(
        port = config.listener.port(),
        address = %config.listener.bind_address,
        "cors-relay v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let listener = net::bind(&config.listener).await?;
    let server = RelayServer::new(config);
    server.serve(listener).await
}
