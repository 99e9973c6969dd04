//! AHP Engine server
//!
//! Loads configuration from the environment, installs the tracing subscriber
//! and serves the HTTP API.

use std::sync::Arc;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ahp_engine::adapters::http::{api_router, DecisionHandlers};
use ahp_engine::adapters::LoggingEventPublisher;
use ahp_engine::application::EvaluateDecisionHandler;
use ahp_engine::config::{AppConfig, LogFormat, ServerConfig};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let handler = EvaluateDecisionHandler::new(
        Arc::new(LoggingEventPublisher::new()),
        config.engine.evaluation_options(),
    );

    let app = api_router(DecisionHandlers::new(Arc::new(handler)))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        %addr,
        environment = ?config.server.environment,
        consistency_threshold = config.engine.consistency_threshold,
        "AHP engine listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match server.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .allowed_origins()
        .into_iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        if server.is_production() {
            warn!("no CORS origins configured in production; cross-origin requests are refused");
            return layer;
        }
        return layer.allow_origin(Any);
    }
    layer.allow_origin(origins)
}
