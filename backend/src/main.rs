use std::sync::Arc;

use axum::{http::HeaderValue, middleware, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use mongli_backend::config::CorsConfig;
use mongli_backend::{logging, routes, AppState, Config, SessionService, SqliteCredentialStore, TokenCodec};

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.origins.trim() == "*" {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(origins)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load().map_err(|e| {
        format!(
            "Failed to load configuration: {}. \
             Make sure config.toml exists or set MONGLI__AUTH__SIGNING_SECRET.",
            e
        )
    })?;

    // Initialize tracing
    logging::init(&config.logging.level);

    tracing::info!("Starting Mongli session service");

    // Initialize components
    let store = SqliteCredentialStore::open(&config.database.url)?;
    let codec = TokenCodec::new(&config.auth)?;
    let sessions = SessionService::new(Arc::new(store), codec, config.session.policy);
    tracing::info!("Session policy: {:?}", config.session.policy);

    let state = Arc::new(AppState { sessions });

    // Build router
    let app = Router::new()
        .merge(routes::router(state))
        .layer(middleware::from_fn(logging::request_logger))
        .layer(cors_layer(&config.cors));

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
