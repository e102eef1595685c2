mod audio;
mod config;
mod error;
mod language;
mod recognizer;
mod routes;
mod state;

use anyhow::Result;
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("wavescribe_backend=debug,tower_http=debug")
        .init();

    // Load configuration - try multiple paths
    // Get the executable directory to resolve relative paths correctly
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
        exe_dir
            .join("conf.yaml")
            .to_str()
            .map(|s| s.to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut config = None;
    for path in &config_paths {
        match Config::load(path) {
            Ok(cfg) => {
                info!("Loaded configuration from: {}", path);
                config = Some(cfg);
                break;
            }
            Err(e) => {
                tracing::debug!("Failed to load config from {}: {}", path, e);
            }
        }
    }

    // Every field has a usable default, so a missing file is not fatal.
    let config = config.unwrap_or_else(|| {
        warn!("No config file found (tried: {:?}), using defaults", config_paths);
        Config::default()
    });

    // Initialize app state
    let app_state = AppState::new(config.clone())?;

    // Build application
    let app = Router::new()
        .merge(routes::create_routes(app_state.clone()))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let addr = format!(
        "{}:{}",
        config.system_config.host, config.system_config.port
    );
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
