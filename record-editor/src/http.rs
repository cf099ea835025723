//! Native HTTP client for the record endpoints

use std::time::Duration;

use async_trait::async_trait;
use shared_types::{ClientId, ClientRecord, ClientSummary};

use crate::api::{decode_envelope, decode_update, RecordApi, RecordApiError, UpdateReceipt};
use crate::diff::RecordPatch;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRecordApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for HttpRecordApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl HttpRecordApiConfig {
    /// `PRACTICE_API_BASE_URL` and `PRACTICE_API_TIMEOUT_SECS`, with defaults.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("PRACTICE_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_secs = std::env::var("PRACTICE_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpRecordApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecordApi {
    pub fn new(config: HttpRecordApiConfig) -> Result<Self, RecordApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RecordApiError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn client_url(&self, id: &ClientId) -> String {
        format!("{}/api/clients/{}", self.base_url, id)
    }

    pub async fn list_clients(&self) -> Result<Vec<ClientSummary>, RecordApiError> {
        let url = format!("{}/api/clients", self.base_url);
        let response = self.client.get(&url).send().await.map_err(transport)?;
        read_envelope(response).await
    }
}

#[async_trait(?Send)]
impl RecordApi for HttpRecordApi {
    async fn get_record(&self, id: &ClientId) -> Result<ClientRecord, RecordApiError> {
        let response = self
            .client
            .get(self.client_url(id))
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
        let response = self
            .client
            .patch(self.client_url(id))
            .json(patch)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport)?;
        decode_update(status, &body)
    }
}

async fn read_envelope<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, RecordApiError> {
    let status = response.status().as_u16();
    let body = response.bytes().await.map_err(transport)?;
    decode_envelope(status, &body)
}

fn transport(e: reqwest::Error) -> RecordApiError {
    RecordApiError::Transport(e.to_string())
}
