use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use record_editor::{decode_envelope, decode_update, RecordApi, RecordApiError, RecordPatch, UpdateReceipt};
use serde::de::DeserializeOwned;
use shared_types::{ClientId, ClientRecord, ClientSummary, LockFieldsRequest};
use std::sync::OnceLock;

/// Get the API base URL based on current environment
/// - In development (localhost): use http://localhost:8080
/// - In production: use same origin (API serves static files)
fn get_api_base() -> String {
    let hostname = web_sys::window()
        .and_then(|w| w.location().hostname().ok())
        .unwrap_or_default();

    if hostname == "localhost" || hostname == "127.0.0.1" {
        "http://localhost:8080".to_string()
    } else {
        "".to_string()
    }
}

static API_BASE_CACHE: OnceLock<String> = OnceLock::new();

/// Get the cached API base URL
pub fn api_base() -> &'static str {
    API_BASE_CACHE.get_or_init(get_api_base).as_str()
}

fn client_url(id: &ClientId) -> String {
    format!("{}/api/clients/{}", api_base(), id)
}

async fn read_body(response: Response) -> Result<(u16, Vec<u8>), RecordApiError> {
    let status = response.status();
    let body = response
        .binary()
        .await
        .map_err(|e| RecordApiError::Transport(e.to_string()))?;
    Ok((status, body))
}

async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<T, RecordApiError> {
    let (status, body) = read_body(response).await?;
    decode_envelope(status, &body)
}

fn transport(e: gloo_net::Error) -> RecordApiError {
    RecordApiError::Transport(e.to_string())
}

/// Browser implementation of the record endpoints
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooRecordApi;

#[async_trait(?Send)]
impl RecordApi for GlooRecordApi {
    async fn get_record(&self, id: &ClientId) -> Result<ClientRecord, RecordApiError> {
        let response = Request::get(&client_url(id))
            .send()
            .await
            .map_err(transport)?;
        read_envelope(response).await
    }

    async fn update_record(
        &self,
        id: &ClientId,
        patch: &RecordPatch,
    ) -> Result<UpdateReceipt, RecordApiError> {
        let response = Request::patch(&client_url(id))
            .json(patch)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        let (status, body) = read_body(response).await?;
        decode_update(status, &body)
    }
}

pub async fn fetch_clients() -> Result<Vec<ClientSummary>, String> {
    let url = format!("{}/api/clients", api_base());
    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {e}"))?;
    read_envelope(response).await.map_err(|e| e.to_string())
}

/// Replace the locked field set (admin action on the "Field locks" tab)
pub async fn update_locked_fields(
    id: &ClientId,
    locked_fields: Vec<String>,
) -> Result<ClientRecord, RecordApiError> {
    let url = format!("{}/locked-fields", client_url(id));
    let response = Request::put(&url)
        .json(&LockFieldsRequest { locked_fields })
        .map_err(transport)?
        .send()
        .await
        .map_err(transport)?;
    read_envelope(response).await
}
