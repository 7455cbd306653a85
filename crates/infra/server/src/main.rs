//! Harvest Auth Server binary.

use harvest_auth_server::{RecoveryServer, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration from the first argument, or fall back to defaults
    let config = match std::env::args().nth(1) {
        Some(path) => ServerConfig::load(&path)?,
        None => ServerConfig::default(),
    };

    // Create and run server
    let server = RecoveryServer::from_config(config)?;
    server.run().await?;

    Ok(())
}
