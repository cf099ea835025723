//! Shared types between the practice API and its clients
//!
//! These types are used by both:
//! - the axum development server (native Rust)
//! - the record editor core and the Dioxus screen (native and WASM)
//!
//! Serializable with serde for JSON over HTTP

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ============================================================================
// Core Types
// ============================================================================

/// Unique identifier for client records
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, TS)]
#[ts(export, export_to = "../../practice-ui/src/types/generated.ts")]
pub struct ClientId(pub String);

impl ClientId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Blank ids are rejected before any request is issued.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ============================================================================
// Client Record
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../../practice-ui/src/types/generated.ts")]
pub enum FilingStatus {
    Single,
    MarriedFilingJointly,
    MarriedFilingSeparately,
    HeadOfHousehold,
    QualifyingSurvivingSpouse,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 5] = [
        FilingStatus::Single,
        FilingStatus::MarriedFilingJointly,
        FilingStatus::MarriedFilingSeparately,
        FilingStatus::HeadOfHousehold,
        FilingStatus::QualifyingSurvivingSpouse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilingStatus::Single => "single",
            FilingStatus::MarriedFilingJointly => "married_filing_jointly",
            FilingStatus::MarriedFilingSeparately => "married_filing_separately",
            FilingStatus::HeadOfHousehold => "head_of_household",
            FilingStatus::QualifyingSurvivingSpouse => "qualifying_surviving_spouse",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilingStatus::Single => "Single",
            FilingStatus::MarriedFilingJointly => "Married filing jointly",
            FilingStatus::MarriedFilingSeparately => "Married filing separately",
            FilingStatus::HeadOfHousehold => "Head of household",
            FilingStatus::QualifyingSurvivingSpouse => "Qualifying surviving spouse",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }

    /// Statuses for which the spouse field group is meaningful.
    pub fn has_spouse(&self) -> bool {
        matches!(
            self,
            FilingStatus::MarriedFilingJointly | FilingStatus::MarriedFilingSeparately
        )
    }
}

/// Nested spouse field group of a client record
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../../practice-ui/src/types/generated.ts")]
pub struct SpouseInfo {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl SpouseInfo {
    pub fn is_empty(&self) -> bool {
        self.first_name.trim().is_empty()
            && self.last_name.trim().is_empty()
            && self.email.trim().is_empty()
            && self.phone.trim().is_empty()
    }
}

/// Client (taxpayer) profile as returned by the record endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../../practice-ui/src/types/generated.ts")]
pub struct ClientRecord {
    pub id: ClientId,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub filing_status: Option<FilingStatus>,
    #[serde(default)]
    pub dependents: u32,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub spouse: Option<SpouseInfo>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Field names an administrator has locked for this record
    #[serde(default)]
    pub locked_fields: Vec<String>,
    /// Server-derived; never sent back in a patch
    #[serde(default)]
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClientRecord {
    /// "First Middle Last" with blank parts skipped
    pub fn compose_display_name(&self) -> String {
        [&self.first_name, &self.middle_name, &self.last_name]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn summary(&self) -> ClientSummary {
        ClientSummary {
            id: self.id.clone(),
            display_name: self.compose_display_name(),
            email: self.email.clone(),
            filing_status: self.filing_status,
            tags: self.tags.clone(),
            locked_field_count: self.locked_fields.len(),
        }
    }
}

/// Row of the client list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../../practice-ui/src/types/generated.ts")]
pub struct ClientSummary {
    pub id: ClientId,
    pub display_name: String,
    pub email: String,
    pub filing_status: Option<FilingStatus>,
    pub tags: Vec<String>,
    pub locked_field_count: usize,
}

// ============================================================================
// Field Vocabulary
// ============================================================================

/// Translation between a form field name and the outbound API field name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    pub form: &'static str,
    pub api: &'static str,
}

impl FieldMapping {
    pub const fn new(form: &'static str, api: &'static str) -> Self {
        Self { form, api }
    }
}

pub const FIELD_FIRST_NAME: &str = "first_name";
pub const FIELD_MIDDLE_NAME: &str = "middle_name";
pub const FIELD_LAST_NAME: &str = "last_name";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_PHONE: &str = "phone_number";
pub const FIELD_FILING_STATUS: &str = "filing_status";
pub const FIELD_DEPENDENTS: &str = "dependents";
pub const FIELD_ADDRESS: &str = "address_line";
pub const FIELD_CITY: &str = "city";
pub const FIELD_STATE: &str = "state";
pub const FIELD_ZIP_CODE: &str = "zip_code";
pub const FIELD_SPOUSE_FIRST_NAME: &str = "spouse_first_name";
pub const FIELD_SPOUSE_LAST_NAME: &str = "spouse_last_name";
pub const FIELD_SPOUSE_EMAIL: &str = "spouse_email";
pub const FIELD_SPOUSE_PHONE: &str = "spouse_phone";

/// Tag collection key, shared by the form, the patch and the lock set
pub const FIELD_TAGS: &str = "tags";

/// Scalar fields the editor tracks. Server-derived fields (`id`,
/// `display_name`, timestamps) never appear here.
pub const CLIENT_FIELDS: &[FieldMapping] = &[
    FieldMapping::new(FIELD_FIRST_NAME, "first_name"),
    FieldMapping::new(FIELD_MIDDLE_NAME, "middle_name"),
    FieldMapping::new(FIELD_LAST_NAME, "last_name"),
    FieldMapping::new(FIELD_EMAIL, "email"),
    FieldMapping::new(FIELD_PHONE, "phone"),
    FieldMapping::new(FIELD_FILING_STATUS, "filing_status"),
    FieldMapping::new(FIELD_DEPENDENTS, "dependents"),
    FieldMapping::new(FIELD_ADDRESS, "address"),
    FieldMapping::new(FIELD_CITY, "city"),
    FieldMapping::new(FIELD_STATE, "state"),
    FieldMapping::new(FIELD_ZIP_CODE, "zip_code"),
    FieldMapping::new(FIELD_SPOUSE_FIRST_NAME, "spouse_first_name"),
    FieldMapping::new(FIELD_SPOUSE_LAST_NAME, "spouse_last_name"),
    FieldMapping::new(FIELD_SPOUSE_EMAIL, "spouse_email"),
    FieldMapping::new(FIELD_SPOUSE_PHONE, "spouse_phone"),
];

pub fn api_name_for(form: &str) -> Option<&'static str> {
    CLIENT_FIELDS
        .iter()
        .find(|mapping| mapping.form == form)
        .map(|mapping| mapping.api)
}

pub fn form_name_for(api: &str) -> Option<&'static str> {
    CLIENT_FIELDS
        .iter()
        .find(|mapping| mapping.api == api)
        .map(|mapping| mapping.form)
}

/// True for every key a patch may carry
pub fn is_patchable_api_field(api: &str) -> bool {
    api == FIELD_TAGS || form_name_for(api).is_some()
}

// ============================================================================
// API Types
// ============================================================================

/// Generic API response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<ApiErrors>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            errors: None,
        }
    }

    pub fn failure(message: impl Into<String>, errors: Option<ApiErrors>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            errors,
        }
    }
}

/// Error payload of a rejected update
///
/// `locked_fields` is set only when the rejection is a lock conflict;
/// every other key is a field name mapped to validation messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApiErrors {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locked_fields: Vec<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Vec<String>>,
}

impl ApiErrors {
    pub fn locked(fields: Vec<String>) -> Self {
        Self {
            locked_fields: fields,
            fields: BTreeMap::new(),
        }
    }

    pub fn is_lock_conflict(&self) -> bool {
        !self.locked_fields.is_empty()
    }
}

/// Admin request replacing a record's locked field set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../../practice-ui/src/types/generated.ts")]
pub struct LockFieldsRequest {
    pub locked_fields: Vec<String>,
}

// ============================================================================
// Tests
// ============================================================================
