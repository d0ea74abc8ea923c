use std::sync::{Arc, Mutex};

use tracing::{error, info};

use newsrelay::bus::Bus;
use newsrelay::config::load_config;
use newsrelay::relay::{fanout, Registry};
use newsrelay::transport::websocket::start_websocket_server;
use newsrelay::utils::error::RelayError;
use newsrelay::utils::logging;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    logging::init(&level);

    if let Err(e) = run_server().await {
        error!("Relay failed: {}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<(), RelayError> {
    let config = load_config()?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let registry = Arc::new(Mutex::new(Registry::new()));
    let bus = Arc::new(Bus::open(&config.bus.url)?);

    tokio::spawn(fanout::run(bus.clone(), registry.clone()));

    tokio::select! {
        _ = start_websocket_server(addr, registry, bus) => {
            error!("WebSocket server exited unexpectedly.");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }

    Ok(())
}
