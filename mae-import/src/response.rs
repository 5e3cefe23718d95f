//! Response parser for the parsing service.
//!
//! Success bodies must be a JSON object with a `rows` array of objects.
//! Failure bodies are mined for the most useful human-readable message.

use serde_json::{Map, Value};

use mae_core::{ImportError, PartialError};
use mae_ingest::RawRow;

pub const FALLBACK_MESSAGE: &str = "Server request failed";

/// A decoded successful `/process` response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProcessResponse {
    pub rows: Vec<RawRow>,
    pub import_id: Option<String>,
    /// Mode the service reports having applied
    pub mode: Option<String>,
    pub row_count: Option<u64>,
    pub errors: Vec<PartialError>,
}

pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Classify a completed exchange: non-2xx becomes `Network`, 2xx is decoded.
pub fn classify(status: u16, body: &[u8]) -> Result<ProcessResponse, ImportError> {
    if !is_success(status) {
        return Err(ImportError::network(status, error_message(body)));
    }
    parse_process_body(body)
}

/// Decode a 2xx body. Only `rows` is required; the metadata fields are read
/// leniently and ignored when missing or mistyped.
pub fn parse_process_body(body: &[u8]) -> Result<ProcessResponse, ImportError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| ImportError::MalformedResponse)?;
    let object = value.as_object().ok_or(ImportError::MalformedResponse)?;
    let rows = object
        .get("rows")
        .and_then(Value::as_array)
        .ok_or(ImportError::MalformedResponse)?;

    let rows = rows
        .iter()
        .map(RawRow::from_value)
        .collect::<Option<Vec<_>>>()
        .ok_or(ImportError::MalformedResponse)?;

    Ok(ProcessResponse {
        rows,
        import_id: string_field(object, "import_id"),
        mode: string_field(object, "mode"),
        row_count: object.get("row_count").and_then(Value::as_u64),
        errors: partial_errors(object),
    })
}

/// Best-effort message for a failed request:
/// `detail` string, then any other `detail` serialized as JSON, then
/// `message` (plus the first `errors[].error`), then a fixed fallback.
pub fn error_message(body: &[u8]) -> String {
    let Ok(Value::Object(object)) = serde_json::from_slice::<Value>(body) else {
        return FALLBACK_MESSAGE.to_string();
    };

    match object.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => return detail.clone(),
        Some(Value::String(_)) | Some(Value::Null) | None => {}
        Some(other) => return other.to_string(),
    }

    if let Some(message) = object
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
    {
        return match first_listed_error(&object) {
            Some(error) => format!("{message} {error}"),
            None => message.to_string(),
        };
    }

    FALLBACK_MESSAGE.to_string()
}

fn first_listed_error(object: &Map<String, Value>) -> Option<&str> {
    object
        .get("errors")?
        .as_array()?
        .iter()
        .find_map(|e| e.get("error").and_then(Value::as_str))
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

fn partial_errors(object: &Map<String, Value>) -> Vec<PartialError> {
    let Some(items) = object.get("errors").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let error = item.get("error").and_then(Value::as_str)?;
            let file = item.get("file").and_then(Value::as_str).unwrap_or_default();
            Some(PartialError {
                file: file.to_string(),
                error: error.to_string(),
            })
        })
        .collect()
}
