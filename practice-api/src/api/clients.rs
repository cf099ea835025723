//! Client record endpoints

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{Map, Value};
use shared_types::{ApiErrors, ApiResponse, ClientId, ClientRecord, LockFieldsRequest};

use crate::api::ApiState;
use crate::store::StoreError;

pub async fn list_clients(State(state): State<ApiState>) -> impl IntoResponse {
    let clients = state.store.list().await;
    let message = format!("{} clients", clients.len());
    (StatusCode::OK, Json(ApiResponse::ok(clients, message)))
}

pub async fn get_client(
    State(state): State<ApiState>,
    Path(client_id): Path<String>,
) -> impl IntoResponse {
    let id = ClientId::from(client_id.as_str());
    match state.store.get(&id).await {
        Some(record) => (
            StatusCode::OK,
            Json(ApiResponse::ok(record, "Client loaded")),
        )
            .into_response(),
        None => not_found(&id),
    }
}

pub async fn update_client(
    State(state): State<ApiState>,
    Path(client_id): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> impl IntoResponse {
    let id = ClientId::from(client_id.as_str());
    let keys: Vec<&String> = body.keys().collect();
    tracing::debug!(client_id = %id, ?keys, "Client patch received");

    match state.store.apply_patch(&id, body).await {
        Ok(record) => {
            tracing::info!(client_id = %id, "Client updated");
            (
                StatusCode::OK,
                Json(ApiResponse::ok(record, "Client updated successfully")),
            )
                .into_response()
        }
        Err(e) => store_error_response(&id, e, "unknown_fields"),
    }
}

pub async fn set_locked_fields(
    State(state): State<ApiState>,
    Path(client_id): Path<String>,
    Json(req): Json<LockFieldsRequest>,
) -> impl IntoResponse {
    let id = ClientId::from(client_id.as_str());
    match state.store.set_locks(&id, &req.locked_fields).await {
        Ok(record) => {
            tracing::info!(
                client_id = %id,
                locked = ?record.locked_fields,
                "Client field locks replaced"
            );
            (
                StatusCode::OK,
                Json(ApiResponse::ok(record, "Field locks updated")),
            )
                .into_response()
        }
        Err(StoreError::UnknownFields(names)) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<ClientRecord>::failure(
                format!("Unknown fields: {}", names.join(", ")),
                Some(field_errors("names", names)),
            )),
        )
            .into_response(),
        Err(e) => store_error_response(&id, e, "names"),
    }
}

fn store_error_response(id: &ClientId, error: StoreError, unknown_key: &str) -> Response {
    match error {
        StoreError::NotFound(_) => not_found(id),
        StoreError::Locked(fields) => {
            tracing::warn!(client_id = %id, ?fields, "Client patch touched locked fields");
            (
                StatusCode::CONFLICT,
                Json(ApiResponse::<ClientRecord>::failure(
                    "Some fields are locked and cannot be updated",
                    Some(ApiErrors::locked(fields)),
                )),
            )
                .into_response()
        }
        StoreError::UnknownFields(names) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::<ClientRecord>::failure(
                format!("Unknown fields: {}", names.join(", ")),
                Some(field_errors(unknown_key, names)),
            )),
        )
            .into_response(),
        StoreError::Invalid(fields) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::<ClientRecord>::failure(
                "Validation failed",
                Some(ApiErrors {
                    locked_fields: Vec::new(),
                    fields,
                }),
            )),
        )
            .into_response(),
    }
}

fn field_errors(key: &str, names: Vec<String>) -> ApiErrors {
    let message = names
        .into_iter()
        .map(|name| format!("{name} is not an editable field"))
        .collect();
    ApiErrors {
        locked_fields: Vec::new(),
        fields: BTreeMap::from([(key.to_string(), message)]),
    }
}

fn not_found(id: &ClientId) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<ClientRecord>::failure(
            format!("Client not found: {id}"),
            None,
        )),
    )
        .into_response()
}
