//! Typed, validated view of a client patch request

use std::borrow::Cow;
use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use shared_types::FilingStatus;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9 ().-]{7,20}$").expect("phone pattern is valid")
});

static ZIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{5}(-[0-9]{4})?$").expect("zip pattern is valid"));

/// Partial update; absent keys are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ClientPatch {
    #[validate(custom(function = "required_text"))]
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    #[validate(custom(function = "required_text"))]
    pub last_name: Option<String>,
    #[validate(custom(function = "email_or_blank"))]
    pub email: Option<String>,
    #[validate(custom(function = "phone_or_blank"))]
    pub phone: Option<String>,
    /// `null` clears the status
    #[serde(default, deserialize_with = "double_option")]
    pub filing_status: Option<Option<FilingStatus>>,
    #[validate(range(max = 20, message = "must be 20 or fewer"))]
    pub dependents: Option<u32>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[validate(custom(function = "zip_or_blank"))]
    pub zip_code: Option<String>,
    pub spouse_first_name: Option<String>,
    pub spouse_last_name: Option<String>,
    #[validate(custom(function = "email_or_blank"))]
    pub spouse_email: Option<String>,
    #[validate(custom(function = "phone_or_blank"))]
    pub spouse_phone: Option<String>,
    pub tags: Option<Vec<String>>,
}

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn required_text(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("required", "must not be blank"));
    }
    Ok(())
}

fn email_or_blank(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.validate_email() {
        return Ok(());
    }
    Err(invalid("email", "must be a valid email address"))
}

fn phone_or_blank(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || PHONE_RE.is_match(value) {
        return Ok(());
    }
    Err(invalid("phone", "must be a valid phone number"))
}

fn zip_or_blank(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || ZIP_RE.is_match(value) {
        return Ok(());
    }
    Err(invalid("zip_code", "must be a 5 or 9 digit ZIP code"))
}

/// Field name to human-readable messages
pub fn error_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|err| {
                    err.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Trim, drop empties, dedupe case-insensitively keeping the first spelling.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.to_lowercase()))
        .map(str::to_string)
        .collect()
}
