use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Log level of a finished request: server failures at ERROR, rejected
/// requests at WARN, everything else at INFO.
pub fn level_for(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::ERROR
    } else if status.is_client_error() {
        Level::WARN
    } else {
        Level::INFO
    }
}

/// Access log middleware, one line per request.
///
/// Headers are never recorded; they carry bearer tokens.
pub async fn request_logger(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let level = level_for(response.status());
    if level == Level::ERROR {
        tracing::error!(%method, %path, status, elapsed_ms, "Request failed");
    } else if level == Level::WARN {
        tracing::warn!(%method, %path, status, elapsed_ms, "Request rejected");
    } else {
        tracing::info!(%method, %path, status, elapsed_ms, "Request served");
    }

    response
}
