//! haemong server binary

use anyhow::{Context, Result};
use haemong::ads::TimerAdGate;
use haemong::api::{create_router, ApiState, UpstreamTarget};
use haemong::orchestrator::Orchestrator;
use haemong::provider::GeminiProvider;
use haemong::HaemongConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

const KEY_ENV: &str = "GEMINI_API_KEY";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting haemong server v{}", env!("CARGO_PKG_VERSION"));

    // Load config from file, falling back to defaults
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "haemong.toml".to_string());

    let config: HaemongConfig = match std::fs::read_to_string(&config_path) {
        Ok(contents) => toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_path))?,
        Err(_) => {
            info!(config_path = config_path, "No config file found, using defaults");
            HaemongConfig::default()
        }
    };

    info!(
        model = config.model,
        port = config.port,
        ad_wait_secs = config.ad_wait_secs,
        "Loaded configuration"
    );

    // The key is re-read per proxy request; this warning is only a heads-up.
    let api_key = std::env::var(KEY_ENV).unwrap_or_else(|_| {
        warn!("{} not set; upstream calls will fail with an auth error", KEY_ENV);
        String::new()
    });

    let provider = GeminiProvider::with_base_url(&config.base_url, api_key, &config.model);
    let ad_gate = TimerAdGate::new(Duration::from_secs(config.ad_wait_secs));

    let upstream = UpstreamTarget {
        base_url: config.base_url.clone(),
        model: config.model.clone(),
        key_env: KEY_ENV.to_string(),
    };

    let port = config.port;
    let orchestrator = Arc::new(Orchestrator::new(
        config,
        Arc::new(provider),
        Arc::new(ad_gate),
    ));

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(120))
        .build()
        .context("Failed to create HTTP client")?;

    let state = Arc::new(ApiState {
        orchestrator,
        upstream,
        client,
    });

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
