//! In-memory client record store
//!
//! Owns the server half of the lock contract: a patch touching any locked
//! key is refused whole, before validation runs.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use serde_json::{Map, Value};
use shared_types::{api_name_for, is_patchable_api_field, ClientId, ClientRecord, ClientSummary};
use tokio::sync::RwLock;
use validator::Validate;

use crate::validation::{error_messages, normalize_tags, ClientPatch};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Client not found: {0}")]
    NotFound(ClientId),
    #[error("Fields are locked: {}", .0.join(", "))]
    Locked(Vec<String>),
    #[error("Unknown fields: {}", .0.join(", "))]
    UnknownFields(Vec<String>),
    #[error("Validation failed")]
    Invalid(BTreeMap<String, Vec<String>>),
}

#[derive(Debug, Default)]
pub struct ClientStore {
    clients: RwLock<BTreeMap<ClientId, ClientRecord>>,
}

impl ClientStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = ClientRecord>) -> Self {
        let clients = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        Self {
            clients: RwLock::new(clients),
        }
    }

    pub async fn list(&self) -> Vec<ClientSummary> {
        let clients = self.clients.read().await;
        let mut summaries: Vec<_> = clients.values().map(ClientRecord::summary).collect();
        summaries.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        summaries
    }

    pub async fn get(&self, id: &ClientId) -> Option<ClientRecord> {
        self.clients.read().await.get(id).cloned()
    }

    pub async fn insert(&self, mut record: ClientRecord) -> ClientRecord {
        record.display_name = record.compose_display_name();
        self.clients
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        record
    }

    /// Apply a partial update. Checks run in order: existence, unknown keys,
    /// locked keys, then shape and validation.
    pub async fn apply_patch(
        &self,
        id: &ClientId,
        body: Map<String, Value>,
    ) -> Result<ClientRecord, StoreError> {
        let mut clients = self.clients.write().await;
        let record = clients
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let unknown: Vec<String> = body
            .keys()
            .filter(|key| !is_patchable_api_field(key))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(StoreError::UnknownFields(unknown));
        }

        let locked: BTreeSet<&str> = record.locked_fields.iter().map(String::as_str).collect();
        let mut conflicts: Vec<String> = body
            .keys()
            .filter(|key| locked.contains(key.as_str()))
            .cloned()
            .collect();
        conflicts.sort();
        if !conflicts.is_empty() {
            return Err(StoreError::Locked(conflicts));
        }

        let patch: ClientPatch = serde_json::from_value(Value::Object(body)).map_err(|e| {
            StoreError::Invalid(BTreeMap::from([(
                "request".to_string(),
                vec![e.to_string()],
            )]))
        })?;
        patch
            .validate()
            .map_err(|e| StoreError::Invalid(error_messages(&e)))?;

        apply(record, patch);
        Ok(record.clone())
    }

    /// Replace the locked set. Accepts API or form names; stores API names.
    pub async fn set_locks(
        &self,
        id: &ClientId,
        names: &[String],
    ) -> Result<ClientRecord, StoreError> {
        let mut resolved = BTreeSet::new();
        let mut unknown = Vec::new();
        for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            if is_patchable_api_field(name) {
                resolved.insert(name.to_string());
            } else if let Some(api) = api_name_for(name) {
                resolved.insert(api.to_string());
            } else {
                unknown.push(name.to_string());
            }
        }
        if !unknown.is_empty() {
            return Err(StoreError::UnknownFields(unknown));
        }

        let mut clients = self.clients.write().await;
        let record = clients
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        record.locked_fields = resolved.into_iter().collect();
        record.updated_at = Utc::now();
        Ok(record.clone())
    }
}

fn apply(record: &mut ClientRecord, patch: ClientPatch) {
    fn set(slot: &mut String, value: Option<String>) {
        if let Some(value) = value {
            *slot = value.trim().to_string();
        }
    }

    set(&mut record.first_name, patch.first_name);
    set(&mut record.middle_name, patch.middle_name);
    set(&mut record.last_name, patch.last_name);
    set(&mut record.email, patch.email);
    set(&mut record.phone, patch.phone);
    set(&mut record.address, patch.address);
    set(&mut record.city, patch.city);
    set(&mut record.state, patch.state);
    set(&mut record.zip_code, patch.zip_code);
    if let Some(status) = patch.filing_status {
        record.filing_status = status;
    }
    if let Some(dependents) = patch.dependents {
        record.dependents = dependents;
    }

    let spouse_touched = patch.spouse_first_name.is_some()
        || patch.spouse_last_name.is_some()
        || patch.spouse_email.is_some()
        || patch.spouse_phone.is_some();
    if spouse_touched {
        let mut spouse = record.spouse.take().unwrap_or_default();
        set(&mut spouse.first_name, patch.spouse_first_name);
        set(&mut spouse.last_name, patch.spouse_last_name);
        set(&mut spouse.email, patch.spouse_email);
        set(&mut spouse.phone, patch.spouse_phone);
        record.spouse = (!spouse.is_empty()).then_some(spouse);
    }

    if let Some(tags) = patch.tags {
        record.tags = normalize_tags(&tags);
    }

    record.display_name = record.compose_display_name();
    record.updated_at = Utc::now();
}

/// Fresh record with timestamps set to now
pub fn new_record(first_name: &str, last_name: &str) -> ClientRecord {
    let now = Utc::now();
    let mut record = ClientRecord {
        id: ClientId::new(),
        first_name: first_name.to_string(),
        middle_name: String::new(),
        last_name: last_name.to_string(),
        email: String::new(),
        phone: String::new(),
        filing_status: None,
        dependents: 0,
        address: String::new(),
        city: String::new(),
        state: String::new(),
        zip_code: String::new(),
        spouse: None,
        tags: Vec::new(),
        locked_fields: Vec::new(),
        display_name: String::new(),
        created_at: now,
        updated_at: now,
    };
    record.display_name = record.compose_display_name();
    record
}
