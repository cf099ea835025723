//! HTTP API routes for the practice desk
//!
//! Every response body is an [`shared_types::ApiResponse`] envelope.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;

pub mod clients;

use crate::store::ClientStore;

#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<ClientStore>,
}

impl ApiState {
    pub fn new(store: ClientStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Configure all API routes
pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/clients", get(clients::list_clients))
        .route(
            "/api/clients/{client_id}",
            get(clients::get_client).patch(clients::update_client),
        )
        .route(
            "/api/clients/{client_id}/locked-fields",
            put(clients::set_locked_fields),
        )
}

async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "practice-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}
