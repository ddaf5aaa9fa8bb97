//! Viewpoints API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p viewpoints-api
//! ```
//!
//! Configuration is loaded from the environment (and `.env`).

use tracing::{error, info};
use viewpoints_common::{try_init_tracing_with_config, AppConfig, TracingConfig};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Server failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        app = %config.app.name,
        env = ?config.app.env,
        port = config.api.port,
        "Configuration loaded"
    );

    viewpoints_api::run(config).await?;

    Ok(())
}
