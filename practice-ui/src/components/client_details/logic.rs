//! Client details pure logic functions: no RSX, no signals

use record_editor::{EditorError, FieldLocks, NavTarget, RecordPatch, SaveOutcome, SaveStart};
use serde_json::Value;
use shared_types::{
    api_name_for, form_name_for, ClientId, FilingStatus, CLIENT_FIELDS, FIELD_TAGS,
};

use super::types::{FieldKind, PROFILE_SECTIONS};

/// Splits a save start into the request to send, or the outcome to report
/// right away when nothing goes over the wire.
pub fn submission(
    start: Result<SaveStart, EditorError>,
) -> Result<(ClientId, RecordPatch), SaveOutcome> {
    match start {
        Ok(SaveStart::Submit { id, patch }) => Ok((id, patch)),
        Ok(SaveStart::NoChanges { proceed_to }) => Err(SaveOutcome::NoChanges { proceed_to }),
        Ok(SaveStart::Busy) => Err(SaveOutcome::Busy),
        Err(e) => Err(SaveOutcome::Blocked(e)),
    }
}

/// Destination released by a completed save, if any
pub fn proceed_target(outcome: &SaveOutcome) -> Option<&NavTarget> {
    match outcome {
        SaveOutcome::Saved { proceed_to } | SaveOutcome::NoChanges { proceed_to } => {
            proceed_to.as_ref()
        }
        _ => None,
    }
}

/// Converts raw input text into the working-copy value for a field.
/// `None` means the text is not a valid value and the edit is ignored.
/// A cleared number input is mid-retype, not a zero.
pub fn input_value(kind: FieldKind, raw: &str) -> Option<Value> {
    match kind {
        FieldKind::Number => raw.trim().parse::<u32>().ok().map(Value::from),
        FieldKind::FilingStatus if raw.is_empty() => Some(Value::Null),
        _ => Some(Value::String(raw.to_string())),
    }
}

pub fn display_value(kind: FieldKind, text: &str) -> String {
    if kind == FieldKind::FilingStatus {
        return FilingStatus::parse(text)
            .map(|status| status.label().to_string())
            .unwrap_or_else(|| "—".to_string());
    }
    if text.trim().is_empty() {
        "—".to_string()
    } else {
        text.to_string()
    }
}

pub fn show_spouse_section(filing_status: &str, spouse_values: &[String]) -> bool {
    FilingStatus::parse(filing_status).is_some_and(|status| status.has_spouse())
        || spouse_values.iter().any(|value| !value.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq)]
pub struct LockRow {
    pub form: &'static str,
    pub api: &'static str,
    pub label: &'static str,
    pub locked: bool,
}

fn label_for(form: &str) -> &'static str {
    if form == FIELD_TAGS {
        return "Tags";
    }
    PROFILE_SECTIONS
        .iter()
        .flat_map(|section| section.fields.iter())
        .find(|def| def.name == form)
        .map(|def| def.label)
        .unwrap_or("Unknown field")
}

pub fn lock_rows(locks: &FieldLocks) -> Vec<LockRow> {
    CLIENT_FIELDS
        .iter()
        .map(|mapping| (mapping.form, mapping.api))
        .chain(std::iter::once((FIELD_TAGS, FIELD_TAGS)))
        .map(|(form, api)| LockRow {
            form,
            api,
            label: label_for(form),
            locked: locks.is_locked(form),
        })
        .collect()
}

/// API names of the lock set after flipping `form`
pub fn toggled_lock_names(locks: &FieldLocks, form: &str) -> Vec<String> {
    let mut names: Vec<String> = locks
        .iter()
        .filter(|name| *name != form)
        .map(|name| api_name_for(name).unwrap_or(name).to_string())
        .collect();
    if !locks.is_locked(form) {
        names.push(api_name_for(form).unwrap_or(form).to_string());
    }
    names.sort();
    names
}

/// Labels of the fields a pending patch would change
pub fn changed_labels(patch: &RecordPatch) -> Vec<String> {
    patch
        .keys()
        .map(|api| label_for(form_name_for(api).unwrap_or(api)).to_string())
        .collect()
}

pub fn save_button_label(saving: bool) -> &'static str {
    if saving {
        "Saving..."
    } else {
        "Save"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{FIELD_EMAIL, FIELD_PHONE};

    #[test]
    fn test_submission_split() {
        let submit = submission(Ok(SaveStart::Submit {
            id: ClientId::from("c-1"),
            patch: RecordPatch::new(),
        }));
        assert!(submit.is_ok());

        assert_eq!(submission(Ok(SaveStart::Busy)).unwrap_err(), SaveOutcome::Busy);
        assert_eq!(
            submission(Err(EditorError::MissingRecordId)).unwrap_err(),
            SaveOutcome::Blocked(EditorError::MissingRecordId)
        );
        let target = NavTarget::Route("/clients".to_string());
        let outcome = submission(Ok(SaveStart::NoChanges {
            proceed_to: Some(target.clone()),
        }))
        .unwrap_err();
        assert_eq!(proceed_target(&outcome), Some(&target));
    }

    #[test]
    fn test_failed_outcome_has_no_target() {
        let outcome = SaveOutcome::Failed {
            message: "boom".to_string(),
        };
        assert_eq!(proceed_target(&outcome), None);
    }

    #[test]
    fn test_input_value() {
        assert_eq!(input_value(FieldKind::Number, " 3 "), Some(Value::from(3u32)));
        assert_eq!(input_value(FieldKind::Number, "0"), Some(Value::from(0u32)));
        assert_eq!(input_value(FieldKind::Number, ""), None);
        assert_eq!(input_value(FieldKind::Number, "  "), None);
        assert_eq!(input_value(FieldKind::Number, "-1"), None);
        assert_eq!(input_value(FieldKind::FilingStatus, ""), Some(Value::Null));
        assert_eq!(
            input_value(FieldKind::Text, "Jane "),
            Some(Value::String("Jane ".to_string()))
        );
    }

    #[test]
    fn test_display_value() {
        assert_eq!(
            display_value(FieldKind::FilingStatus, "head_of_household"),
            "Head of household"
        );
        assert_eq!(display_value(FieldKind::FilingStatus, ""), "—");
        assert_eq!(display_value(FieldKind::Text, "  "), "—");
    }

    #[test]
    fn test_spouse_section_visibility() {
        assert!(show_spouse_section("married_filing_jointly", &[]));
        assert!(!show_spouse_section("single", &[String::new()]));
        assert!(show_spouse_section("single", &["John".to_string()]));
    }

    #[test]
    fn test_changed_labels() {
        let mut patch = RecordPatch::new();
        patch.insert("phone", Value::String("555-0100".to_string()));
        patch.insert(FIELD_TAGS, Value::Array(Vec::new()));
        assert_eq!(changed_labels(&patch), vec!["Phone", "Tags"]);
    }

    #[test]
    fn test_lock_rows_and_toggle() {
        let locks = FieldLocks::from_names(["phone"]);
        let rows = lock_rows(&locks);
        let phone = rows.iter().find(|row| row.form == FIELD_PHONE).unwrap();
        assert!(phone.locked);
        assert_eq!(phone.api, "phone");
        assert_eq!(phone.label, "Phone");
        assert!(rows.iter().any(|row| row.form == FIELD_TAGS));

        assert_eq!(toggled_lock_names(&locks, FIELD_EMAIL), vec!["email", "phone"]);
        assert!(toggled_lock_names(&locks, FIELD_PHONE).is_empty());
    }
}
