use std::path::PathBuf;
use std::sync::Arc;

use accessmap_core::clock::{Clock, SystemClock};
use accessmap_core::config::{CliConfigOverrides, LayeredConfig};
use accessmap_recording::{spawn_expiry_sweep, SessionRegistry};
use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use accessmap_api::config::ApiConfig;
use accessmap_api::router::create_router;
use accessmap_api::state::AppState;

/// Route recording and accessibility discovery API server
#[derive(Debug, Parser)]
#[command(name = "accessmap-api", version, about)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "ACCESSMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides ACCESSMAP_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Seconds of inactivity before a recording is discarded
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    idle_timeout_secs: Option<u64>,

    /// Seconds between expiry sweeps
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    sweep_interval_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "accessmap_api=info,accessmap_recording=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = LayeredConfig::with_defaults();
    if let Some(path) = &args.config {
        config = config
            .load_from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?;
    }
    let mut config = config.load_from_env();
    config.update_from_cli(CliConfigOverrides {
        session_idle_timeout_secs: args.idle_timeout_secs,
        sweep_interval_secs: args.sweep_interval_secs,
        ..Default::default()
    });

    let mut api_config = ApiConfig::from_env();
    if let Some(port) = args.port {
        api_config.port = port;
    }

    for (key, (value, source)) in config.to_inspection_map() {
        tracing::debug!(key = %key, value = %value, source = ?source, "Configuration");
    }

    tracing::info!(
        port = api_config.port,
        idle_timeout_secs = config.session_idle_timeout_secs.value,
        sweep_interval_secs = config.sweep_interval_secs.value,
        "Starting AccessMap API server"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let registry = Arc::new(SessionRegistry::from_config(&config, Arc::clone(&clock)));
    let sweep = spawn_expiry_sweep(Arc::clone(&registry), config.sweep_interval());

    let state = Arc::new(AppState::new(registry, clock, config));

    let origin = api_config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("invalid CORS origin {}", api_config.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = create_router(state).layer(cors).layer(TraceLayer::new_for_http());

    let addr = api_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", api_config.cors_origin);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    sweep.shutdown().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
