//! Axum Integration Example
//!
//! Demonstrates response caching with the Axum web framework.
//!
//! Features shown:
//! - One cache layer (and write queue) shared by several routes
//! - Per-route expiry through a `MaxAge` response extension
//! - A shared cache key staged by an upstream middleware (`x-cache-key` hint)
//! - Error responses are never cached
//!
//! Run:
//!   cargo run -p cachet-demos --example axum
//!
//! Endpoints:
//!   - http://localhost:3000/tasks              - Task list (cached, 60s)
//!   - http://localhost:3000/tasks/{id}         - Task details (cached, 300s)
//!   - http://localhost:3000/tasks/public?x=1   - Shares one entry for any query
//!   - http://localhost:3000/health             - Health check (POST bypasses)
//!
//! Try it:
//!   curl -v http://localhost:3000/tasks        # x-cache-status: MISS, then HIT
//!   curl -v http://localhost:3000/tasks/42     # 404, stays MISS
//!   curl -v -X POST http://localhost:3000/health

use std::time::Duration;

use axum::{
    BoxError, Extension, Json, Router,
    error_handling::HandleErrorLayer,
    extract::{Path, Request},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use cachet::CacheError;
use cachet_moka::MokaBackend;
use cachet_tower::{Cache, MaxAge, ResponseLocals};
use http::StatusCode;
use serde::Serialize;
use tower::ServiceBuilder;

#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: u32,
    pub title: String,
    pub done: bool,
}

fn all_tasks() -> Vec<Task> {
    vec![
        Task {
            id: 1,
            title: "Set up project structure".into(),
            done: true,
        },
        Task {
            id: 2,
            title: "Add caching layer".into(),
            done: false,
        },
        Task {
            id: 3,
            title: "Write API documentation".into(),
            done: false,
        },
    ]
}

// Handlers

async fn list_tasks() -> impl IntoResponse {
    tracing::info!("Fetching task list");
    (Extension(MaxAge(60)), Json(all_tasks()))
}

async fn get_task(Path(task_id): Path<u32>) -> Result<impl IntoResponse, StatusCode> {
    tracing::info!("Fetching task details: id={}", task_id);

    all_tasks()
        .into_iter()
        .find(|t| t.id == task_id)
        .map(|task| (Extension(MaxAge(300)), Json(task)))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn public_tasks() -> Json<Vec<Task>> {
    tracing::info!("Fetching public tasks");
    Json(all_tasks().into_iter().filter(|t| !t.done).collect())
}

async fn health() -> &'static str {
    "OK"
}

/// Stages a fixed cache key so every query string shares one entry.
async fn shared_key(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(
        ResponseLocals::new()
            .with_header("x-cache-key", "tasks:public")
            .with_max_age(MaxAge(30)),
    );
    next.run(request).await
}

async fn handle_cache_error(error: BoxError) -> (StatusCode, String) {
    match error.downcast_ref::<CacheError>() {
        Some(error) => (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()),
        None => (StatusCode::BAD_GATEWAY, format!("upstream failed: {error}")),
    }
}

#[tokio::main]
async fn main() {
    let subscriber = tracing_subscriber::fmt()
        .pretty()
        .with_env_filter("debug,cachet=trace")
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let backend = MokaBackend::builder().max_entries(10_000).build();
    let cache = Cache::builder()
        .backend(backend)
        .default_expiry(Duration::from_secs(3600))
        .build()
        .expect("valid cache configuration");

    let cached = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_cache_error))
        .layer(cache);

    // The key hint must be staged before the cache layer runs, so the
    // middleware wraps the cached route.
    let app = Router::new()
        .route("/tasks", get(list_tasks).layer(cached.clone()))
        .route("/tasks/{task_id}", get(get_task).layer(cached.clone()))
        .route(
            "/tasks/public",
            get(public_tasks)
                .layer(cached.clone())
                .layer(middleware::from_fn(shared_key)),
        )
        .route("/health", get(health).post(health).layer(cached));

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("Failed to bind to port 3000");
    tracing::info!("Listening on http://{}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Server error");
}
