//! Collaborator seams: the record endpoints, notifications and navigation.
//!
//! Envelope decoding lives here so every transport classifies responses the
//! same way.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared_types::{ApiErrors, ApiResponse, ClientId, ClientRecord};

use crate::diff::RecordPatch;
use crate::guard::NavTarget;

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum RecordApiError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("HTTP error: {status}")]
    Http { status: u16 },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("{message}")]
    Rejected { message: String, errors: ApiErrors },

    #[error("Request cancelled")]
    Cancelled,
}

impl RecordApiError {
    /// Fields the server reported as locked, when this is a lock conflict.
    pub fn locked_fields(&self) -> Option<&[String]> {
        match self {
            RecordApiError::Rejected { errors, .. } if errors.is_lock_conflict() => {
                Some(errors.locked_fields.as_slice())
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for RecordApiError {
    fn from(e: serde_json::Error) -> Self {
        RecordApiError::Decode(e.to_string())
    }
}

/// Result of a successful update
///
/// `locked_fields` is `None` when the response did not mention locks at
/// all, which is different from an empty list.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateReceipt {
    pub record: Option<ClientRecord>,
    pub locked_fields: Option<Vec<String>>,
}

#[async_trait(?Send)]
pub trait RecordApi {
    async fn get_record(&self, id: &ClientId) -> Result<ClientRecord, RecordApiError>;

    async fn update_record(
        &self,
        id: &ClientId,
        patch: &RecordPatch,
    ) -> Result<UpdateReceipt, RecordApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Fire-and-forget toasts
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

pub trait Navigator {
    fn navigate(&self, target: &NavTarget);
}

/// Decode a `{success, data, message, errors}` envelope carrying `T`.
pub fn decode_envelope<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T, RecordApiError> {
    let envelope = parse_envelope::<T>(status, body)?;
    envelope
        .data
        .ok_or_else(|| RecordApiError::Decode("missing data in response".to_string()))
}

/// Decode the update response, keeping track of whether locks were reported.
pub fn decode_update(status: u16, body: &[u8]) -> Result<UpdateReceipt, RecordApiError> {
    let envelope = parse_envelope::<Value>(status, body)?;
    let data = envelope.data.unwrap_or(Value::Null);
    if data.is_null() {
        return Ok(UpdateReceipt {
            record: None,
            locked_fields: None,
        });
    }

    let locked_fields = match data.get("locked_fields") {
        None | Some(Value::Null) => None,
        Some(value) => Some(serde_json::from_value::<Vec<String>>(value.clone())?),
    };
    let record = serde_json::from_value::<ClientRecord>(data)?;

    Ok(UpdateReceipt {
        record: Some(record),
        locked_fields,
    })
}

fn parse_envelope<T: DeserializeOwned>(
    status: u16,
    body: &[u8],
) -> Result<ApiResponse<T>, RecordApiError> {
    let envelope: ApiResponse<T> = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(e) if is_success_status(status) => return Err(e.into()),
        Err(_) => return Err(status_error(status, None)),
    };

    if envelope.success {
        return Ok(envelope);
    }

    let message = envelope
        .message
        .clone()
        .unwrap_or_else(|| "Request was rejected".to_string());
    match envelope.errors {
        Some(errors) => Err(RecordApiError::Rejected { message, errors }),
        None if status == 404 => Err(RecordApiError::NotFound(message)),
        None if is_success_status(status) || status == 409 || status == 422 => {
            Err(RecordApiError::Rejected {
                message,
                errors: ApiErrors::default(),
            })
        }
        None => Err(status_error(status, Some(message))),
    }
}

fn status_error(status: u16, message: Option<String>) -> RecordApiError {
    if status == 404 {
        return RecordApiError::NotFound(message.unwrap_or_else(|| "not found".to_string()));
    }
    RecordApiError::Http { status }
}

fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}
