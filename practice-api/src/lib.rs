//! Practice desk API - in-memory client record service
//!
//! Serves the record endpoints the editor talks to, including the
//! field-lock conflict (409) and validation (422) responses.

pub mod api;
pub mod config;
pub mod seed;
pub mod store;
pub mod validation;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Router with state and tracing attached; callers add CORS.
pub fn app(state: api::ApiState) -> Router {
    api::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve on an already-bound listener until the task is dropped.
pub async fn serve(
    listener: TcpListener,
    state: api::ApiState,
    cors: Option<CorsLayer>,
) -> std::io::Result<()> {
    let app = match cors {
        Some(cors) => app(state).layer(cors),
        None => app(state),
    };
    axum::serve(listener, app).await
}
