//! Diff engine
//!
//! Computes the minimal patch between the original and working snapshots.
//! Only fields listed in the translation table are compared, so derived
//! server values can never leak back into an update.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared_types::{FieldMapping, FIELD_TAGS};

use crate::snapshot::FieldMap;

/// Partial update payload keyed by API field name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordPatch(Map<String, Value>);

impl RecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, api_field: &str) -> Option<&Value> {
        self.0.get(api_field)
    }

    pub fn contains(&self, api_field: &str) -> bool {
        self.0.contains_key(api_field)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn insert(&mut self, api_field: impl Into<String>, value: Value) {
        self.0.insert(api_field.into(), value);
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

pub fn compute_diff(
    original: &FieldMap,
    working: &FieldMap,
    original_tags: &[String],
    working_tags: &[String],
    table: &[FieldMapping],
) -> RecordPatch {
    let mut patch = RecordPatch::new();

    for mapping in table {
        let before = original.get(mapping.form).unwrap_or(&Value::Null);
        let after = working.get(mapping.form).unwrap_or(&Value::Null);
        if normalize_value(before) != normalize_value(after) {
            patch.insert(mapping.api, after.clone());
        }
    }

    if !tags_equal(original_tags, working_tags) {
        patch.insert(
            FIELD_TAGS,
            Value::Array(working_tags.iter().cloned().map(Value::String).collect()),
        );
    }

    patch
}

/// Trims strings; every other value compares as-is.
pub fn normalize_value(value: &Value) -> Value {
    match value {
        Value::String(text) => Value::String(text.trim().to_string()),
        other => other.clone(),
    }
}

/// Order- and case-insensitive set equality.
pub fn tags_equal(a: &[String], b: &[String]) -> bool {
    normalized_tags(a) == normalized_tags(b)
}

fn normalized_tags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = tags
        .iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(str::to_lowercase)
        .collect();
    normalized.sort();
    normalized.dedup();
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared_types::CLIENT_FIELDS;

    fn fields(pairs: &[(&str, Value)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_identical_snapshots_produce_empty_patch() {
        let original = fields(&[("first_name", json!("Jane")), ("city", json!("Springfield"))]);
        let patch = compute_diff(&original, &original, &[], &[], CLIENT_FIELDS);
        assert!(patch.is_empty());
    }

    #[test]
    fn test_patch_has_exactly_the_changed_fields() {
        let original = fields(&[
            ("first_name", json!("Jane")),
            ("city", json!("Springfield")),
            ("zip_code", json!("62701")),
            ("dependents", json!(1)),
        ]);
        let working = fields(&[
            ("first_name", json!("Janet")),
            ("city", json!("Springfield")),
            ("zip_code", json!("62704")),
            ("dependents", json!(1)),
        ]);
        let patch = compute_diff(&original, &working, &[], &[], CLIENT_FIELDS);
        assert_eq!(patch.len(), 2);
        assert_eq!(patch.get("first_name"), Some(&json!("Janet")));
        assert_eq!(patch.get("zip_code"), Some(&json!("62704")));
    }

    #[test]
    fn test_whitespace_only_changes_are_ignored() {
        let original = fields(&[("city", json!("Springfield"))]);
        let working = fields(&[("city", json!("  Springfield "))]);
        assert!(compute_diff(&original, &working, &[], &[], CLIENT_FIELDS).is_empty());
    }

    #[test]
    fn test_changed_value_is_sent_untrimmed() {
        let original = fields(&[("city", json!("Springfield"))]);
        let working = fields(&[("city", json!(" Shelbyville "))]);
        let patch = compute_diff(&original, &working, &[], &[], CLIENT_FIELDS);
        assert_eq!(patch.get("city"), Some(&json!(" Shelbyville ")));
    }

    #[test]
    fn test_form_names_translate_to_api_names() {
        let original = fields(&[
            ("phone_number", json!("555-1111")),
            ("address_line", json!("1 Main St")),
        ]);
        let working = fields(&[
            ("phone_number", json!("555-2222")),
            ("address_line", json!("2 Oak Ave")),
        ]);
        let patch = compute_diff(&original, &working, &[], &[], CLIENT_FIELDS);
        assert_eq!(patch.keys().collect::<Vec<_>>(), vec!["address", "phone"]);
    }

    #[test]
    fn test_untracked_fields_never_appear() {
        let original = fields(&[("display_name", json!("Jane Doe"))]);
        let working = fields(&[("display_name", json!("Someone Else"))]);
        assert!(compute_diff(&original, &working, &[], &[], CLIENT_FIELDS).is_empty());
    }

    #[test]
    fn test_non_string_values_compare_exactly() {
        let original = fields(&[("dependents", json!(1)), ("filing_status", Value::Null)]);
        let working = fields(&[("dependents", json!(2)), ("filing_status", json!("single"))]);
        let patch = compute_diff(&original, &working, &[], &[], CLIENT_FIELDS);
        assert_eq!(patch.get("dependents"), Some(&json!(2)));
        assert_eq!(patch.get("filing_status"), Some(&json!("single")));
    }

    #[test]
    fn test_missing_value_equals_null() {
        let original = fields(&[("filing_status", Value::Null)]);
        assert!(compute_diff(&original, &FieldMap::new(), &[], &[], CLIENT_FIELDS).is_empty());
    }

    #[test]
    fn test_tag_sets_ignore_order_and_case() {
        let patch = compute_diff(
            &FieldMap::new(),
            &FieldMap::new(),
            &tags(&["VIP", "Rush"]),
            &tags(&["rush", "vip"]),
            CLIENT_FIELDS,
        );
        assert!(patch.is_empty());
    }

    #[test]
    fn test_tag_change_sends_full_working_list() {
        let patch = compute_diff(
            &FieldMap::new(),
            &FieldMap::new(),
            &tags(&["VIP"]),
            &tags(&["VIP", "Rush"]),
            CLIENT_FIELDS,
        );
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.get("tags"), Some(&json!(["VIP", "Rush"])));
    }

    #[test]
    fn test_blank_tags_are_ignored_for_equality() {
        assert!(tags_equal(&tags(&["VIP", " "]), &tags(&[" vip"])));
        assert!(!tags_equal(&tags(&["VIP"]), &tags(&[])));
    }

    #[test]
    fn test_patch_serializes_as_flat_object() {
        let mut patch = RecordPatch::new();
        patch.insert("first_name", json!("Janet"));
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"first_name": "Janet"}));
    }
}
