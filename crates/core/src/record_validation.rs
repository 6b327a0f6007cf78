//! Request validation for medical records.
//!
//! Payload fields arrive as raw JSON values so the validator can apply the
//! "falsy means missing" rule: an absent key, `null`, `""`, `false` and a
//! numeric zero are all reported as missing. Present strings that trim to
//! nothing are reported as blank. NUL characters are rejected everywhere
//! because PostgreSQL `TEXT` cannot store them.

use serde::Deserialize;
use serde_json::Value;

use crate::error::CoreError;
use crate::types::DbId;

/// Name of the diagnosis field as it appears in request payloads.
pub const FIELD_DIAGNOSIS: &str = "diagnosis";
/// Name of the status field as it appears in request payloads.
pub const FIELD_STATUS: &str = "status";
/// Name of the note field as it appears in request payloads.
pub const FIELD_NOTE: &str = "note";

/// Candidate record payload as submitted by a client.
///
/// Every key is optional and untyped; [`validate_record_payload`] decides
/// whether the payload is acceptable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordPayload {
    #[serde(default)]
    pub diagnosis: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub note: Option<Value>,
}

/// The three record fields after validation, trimmed and ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields {
    pub diagnosis: String,
    pub status: String,
    pub note: String,
}

/// Why a record payload was rejected. Each variant lists the offending
/// fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordValidationError {
    #[error("Missing required fields: {}", .fields.join(", "))]
    Missing { fields: Vec<&'static str> },

    #[error("Fields must be strings: {}", .fields.join(", "))]
    InvalidType { fields: Vec<&'static str> },

    #[error("Fields cannot contain NUL characters: {}", .fields.join(", "))]
    NulCharacter { fields: Vec<&'static str> },

    #[error("Fields cannot be blank: {}", .fields.join(", "))]
    Blank { fields: Vec<&'static str> },
}

impl From<RecordValidationError> for CoreError {
    fn from(err: RecordValidationError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

/// Validate a record payload.
///
/// Checks run in order: missing (falsy) fields, non-string fields, fields
/// containing NUL, then blank-after-trim fields. On success the trimmed
/// values are returned.
pub fn validate_record_payload(
    payload: &RecordPayload,
) -> Result<RecordFields, RecordValidationError> {
    let entries = [
        (FIELD_DIAGNOSIS, payload.diagnosis.as_ref()),
        (FIELD_STATUS, payload.status.as_ref()),
        (FIELD_NOTE, payload.note.as_ref()),
    ];

    let missing = offending(&entries, is_falsy);
    if !missing.is_empty() {
        return Err(RecordValidationError::Missing { fields: missing });
    }

    let invalid = offending(&entries, |v| !matches!(v, Some(Value::String(_))));
    if !invalid.is_empty() {
        return Err(RecordValidationError::InvalidType { fields: invalid });
    }

    let nul = offending(&entries, |v| v.and_then(Value::as_str).is_some_and(has_nul));
    if !nul.is_empty() {
        return Err(RecordValidationError::NulCharacter { fields: nul });
    }

    let blank = offending(&entries, |v| {
        v.and_then(Value::as_str)
            .is_some_and(|s| s.trim().is_empty())
    });
    if !blank.is_empty() {
        return Err(RecordValidationError::Blank { fields: blank });
    }

    Ok(RecordFields {
        diagnosis: trimmed(payload.diagnosis.as_ref()),
        status: trimmed(payload.status.as_ref()),
        note: trimmed(payload.note.as_ref()),
    })
}

/// Whether a JSON value counts as "missing": absent, `null`, `false`, `""`
/// or numeric zero.
pub fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

/// Require a query parameter to be present and non-blank; returns it trimmed.
pub fn require_non_blank(name: &str, value: Option<&str>) -> Result<String, CoreError> {
    match value.map(str::trim) {
        Some(v) if has_nul(v) => Err(CoreError::Validation(format!(
            "Query parameter '{name}' cannot contain NUL characters"
        ))),
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(CoreError::Validation(format!(
            "Query parameter '{name}' is required and cannot be blank"
        ))),
    }
}

fn has_nul(s: &str) -> bool {
    s.contains('\0')
}

/// Validate the free-text search term (`q`).
pub fn validate_search_term(term: Option<&str>) -> Result<String, CoreError> {
    require_non_blank("q", term)
}

/// Parse a record id taken from a URL path segment.
pub fn parse_record_id(raw: &str) -> Result<DbId, CoreError> {
    raw.parse::<DbId>().map_err(|_| {
        CoreError::Validation(format!("Invalid record id '{raw}': must be an integer"))
    })
}

fn offending(
    entries: &[(&'static str, Option<&Value>)],
    pred: impl Fn(Option<&Value>) -> bool,
) -> Vec<&'static str> {
    entries
        .iter()
        .filter(|(_, v)| pred(*v))
        .map(|(name, _)| *name)
        .collect()
}

fn trimmed(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}
