use std::env;
use std::path::Path;

use anyhow::anyhow;
use tokio::net::TcpListener;

use tts_gateway::{ServerConfig, config::CONFIG_PATH_ENV, routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration: YAML file when TTS_CONFIG_PATH is set, otherwise
    // environment variables only
    let config = match env::var(CONFIG_PATH_ENV) {
        Ok(path) => ServerConfig::from_file(Path::new(&path)),
        Err(_) => ServerConfig::from_env(),
    }
    .map_err(|e| anyhow!(e.to_string()))?;

    let address = config.address();
    println!("Starting server on {address}");

    // Create application state
    let app_state = AppState::new(config).map_err(|e| anyhow!(e.to_string()))?;

    let app = routes::api::create_api_router().with_state(app_state);

    // Create listener
    let listener = TcpListener::bind(&address).await?;

    println!("Server listening on {address}");

    // Start server
    axum::serve(listener, app).await?;

    Ok(())
}
