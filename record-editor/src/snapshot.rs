//! Form snapshot store
//!
//! Holds the `original` (last confirmed server state) and `working` (live
//! edit buffer) copies of a record's editable fields, plus the tag pair.
//! Only `working` is ever mutated by edits.

use std::collections::BTreeMap;

use serde_json::Value;
use shared_types::{
    api_name_for, ClientRecord, FIELD_ADDRESS, FIELD_CITY, FIELD_DEPENDENTS, FIELD_EMAIL,
    FIELD_FILING_STATUS, FIELD_FIRST_NAME, FIELD_LAST_NAME, FIELD_MIDDLE_NAME, FIELD_PHONE,
    FIELD_SPOUSE_EMAIL, FIELD_SPOUSE_FIRST_NAME, FIELD_SPOUSE_LAST_NAME, FIELD_SPOUSE_PHONE,
    FIELD_STATE, FIELD_TAGS, FIELD_ZIP_CODE,
};

use crate::diff::tags_equal;
use crate::locks::FieldLocks;

/// Form field name to value
pub type FieldMap = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    Locked,
    UnknownField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOutcome {
    Added,
    Removed,
    Duplicate,
    Empty,
    NotFound,
    Locked,
}

/// Editable projection of a record, keyed by form field name.
pub fn project_record(record: &ClientRecord) -> FieldMap {
    let spouse = record.spouse.clone().unwrap_or_default();
    let filing_status = record
        .filing_status
        .map(|status| Value::String(status.as_str().to_string()))
        .unwrap_or(Value::Null);

    let mut fields = FieldMap::new();
    let mut put = |name: &str, value: Value| {
        fields.insert(name.to_string(), value);
    };
    put(FIELD_FIRST_NAME, Value::from(record.first_name.as_str()));
    put(FIELD_MIDDLE_NAME, Value::from(record.middle_name.as_str()));
    put(FIELD_LAST_NAME, Value::from(record.last_name.as_str()));
    put(FIELD_EMAIL, Value::from(record.email.as_str()));
    put(FIELD_PHONE, Value::from(record.phone.as_str()));
    put(FIELD_FILING_STATUS, filing_status);
    put(FIELD_DEPENDENTS, Value::from(record.dependents));
    put(FIELD_ADDRESS, Value::from(record.address.as_str()));
    put(FIELD_CITY, Value::from(record.city.as_str()));
    put(FIELD_STATE, Value::from(record.state.as_str()));
    put(FIELD_ZIP_CODE, Value::from(record.zip_code.as_str()));
    put(FIELD_SPOUSE_FIRST_NAME, Value::from(spouse.first_name));
    put(FIELD_SPOUSE_LAST_NAME, Value::from(spouse.last_name));
    put(FIELD_SPOUSE_EMAIL, Value::from(spouse.email));
    put(FIELD_SPOUSE_PHONE, Value::from(spouse.phone));
    fields
}

/// Values sent with an in-flight save
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmittedCopy {
    fields: FieldMap,
    tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSnapshot {
    original: FieldMap,
    working: FieldMap,
    original_tags: Vec<String>,
    working_tags: Vec<String>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_record(record: &ClientRecord) -> Self {
        let mut snapshot = Self::new();
        snapshot.load(record);
        snapshot
    }

    /// Both snapshots become the record's editable projection.
    pub fn load(&mut self, record: &ClientRecord) {
        self.original = project_record(record);
        self.working = self.original.clone();
        self.original_tags = record.tags.clone();
        self.working_tags = record.tags.clone();
    }

    /// Mutates `working` only. Locked and untracked fields are left alone.
    pub fn edit(&mut self, locks: &FieldLocks, field: &str, value: impl Into<Value>) -> EditOutcome {
        if locks.is_locked(field) {
            tracing::debug!(field, "Ignoring edit of locked field");
            return EditOutcome::Locked;
        }
        if api_name_for(field).is_none() {
            tracing::debug!(field, "Ignoring edit of untracked field");
            return EditOutcome::UnknownField;
        }
        self.working.insert(field.to_string(), value.into());
        EditOutcome::Applied
    }

    /// Copy of `working` as it stands when a save is submitted
    pub fn submitted(&self) -> SubmittedCopy {
        SubmittedCopy {
            fields: self.working.clone(),
            tags: self.working_tags.clone(),
        }
    }

    /// Promotes the submitted values to `original`. Edits made to `working`
    /// after submission stay pending.
    pub fn commit(&mut self, submitted: SubmittedCopy) {
        self.original = submitted.fields;
        self.original_tags = submitted.tags;
    }

    /// Replaces `original` with fresh server state while carrying pending
    /// edits over onto `working`. Pending edits to fields that are now
    /// locked are dropped.
    pub fn rebase(&mut self, record: &ClientRecord, locks: &FieldLocks) {
        let pending: Vec<(String, Value)> = self
            .working
            .iter()
            .filter(|(field, value)| self.original.get(*field) != Some(*value))
            .filter(|(field, _)| !locks.is_locked(field))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect();
        let tags_pending = !locks.is_locked(FIELD_TAGS)
            && !tags_equal(&self.original_tags, &self.working_tags);
        let working_tags = std::mem::take(&mut self.working_tags);

        self.load(record);
        for (field, value) in pending {
            tracing::debug!(field = %field, "Keeping unsaved edit across refresh");
            self.working.insert(field, value);
        }
        if tags_pending {
            self.working_tags = working_tags;
        }
    }

    pub fn revert(&mut self) {
        self.working = self.original.clone();
        self.working_tags = self.original_tags.clone();
    }

    pub fn add_tag(&mut self, locks: &FieldLocks, tag: &str) -> TagOutcome {
        if locks.is_locked(FIELD_TAGS) {
            return TagOutcome::Locked;
        }
        let tag = tag.trim();
        if tag.is_empty() {
            return TagOutcome::Empty;
        }
        let folded = tag.to_lowercase();
        if self
            .working_tags
            .iter()
            .any(|existing| existing.trim().to_lowercase() == folded)
        {
            return TagOutcome::Duplicate;
        }
        self.working_tags.push(tag.to_string());
        TagOutcome::Added
    }

    pub fn remove_tag(&mut self, locks: &FieldLocks, tag: &str) -> TagOutcome {
        if locks.is_locked(FIELD_TAGS) {
            return TagOutcome::Locked;
        }
        let folded = tag.trim().to_lowercase();
        let before = self.working_tags.len();
        self.working_tags
            .retain(|existing| existing.trim().to_lowercase() != folded);
        if self.working_tags.len() == before {
            TagOutcome::NotFound
        } else {
            TagOutcome::Removed
        }
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.working.get(field)
    }

    /// Working value rendered for a text input; `null` becomes empty.
    pub fn text(&self, field: &str) -> String {
        match self.working.get(field) {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    pub fn original(&self) -> &FieldMap {
        &self.original
    }

    pub fn working(&self) -> &FieldMap {
        &self.working
    }

    pub fn original_tags(&self) -> &[String] {
        &self.original_tags
    }

    pub fn working_tags(&self) -> &[String] {
        &self.working_tags
    }
}
