//! YAML Configuration Example
//!
//! Builds the cache layer from a configuration document instead of code.
//! The backend is chosen by the document; pass `redis` as the first argument
//! to use a local Redis server.
//!
//! Run:
//!   cargo run -p cachet-demos --example configuration
//!   cargo run -p cachet-demos --example configuration -- redis
//!
//! Try it:
//!   curl -v http://localhost:3002/greeting     # MISS, then HIT
//!   curl -v http://localhost:3002/greeting -H 'accept: text/plain'

use axum::{BoxError, Router, error_handling::HandleErrorLayer, routing::get};
use cachet_configuration::CacheConfig;
use cachet_tower::CacheBuilder;
use http::StatusCode;
use tower::ServiceBuilder;

const MOKA_CONFIG: &str = r#"
default_expiry: 10m
status_header: x-cache-status
backend:
  type: Moka
  max_entries: 1000
  label: greetings
"#;

const REDIS_CONFIG: &str = r#"
default_expiry: 1h
headers_suffix: ":meta"
backend:
  type: Redis
  server: redis://127.0.0.1:6379/
  prefix: "demo:"
"#;

async fn greeting() -> ([(http::HeaderName, &'static str); 1], &'static str) {
    tracing::info!("Rendering greeting");
    (
        [(http::header::CACHE_CONTROL, "public, max-age=120")],
        "Hello from a configured cache!",
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter("info,cachet=debug")
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let document = match std::env::args().nth(1).as_deref() {
        Some("redis") => REDIS_CONFIG,
        _ => MOKA_CONFIG,
    };
    let (backend, settings) = CacheConfig::from_yaml(document)?.into_parts()?;
    tracing::info!(backend = backend.name(), ?settings, "Cache configured");

    let cache = CacheBuilder::new(backend).settings(settings).build()?;

    let app = Router::new().route(
        "/greeting",
        get(greeting).layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(|error: BoxError| async move {
                    (StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
                }))
                .layer(cache),
        ),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3002").await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
