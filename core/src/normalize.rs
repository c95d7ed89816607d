//! Error normalization and payload unwrapping for raw response bodies.
//!
//! # Design
//! The server signals failure in several shapes depending on the API
//! version that handled the call, and often sends more than one at once.
//! `normalize` checks them in a fixed order and the first match wins:
//!
//! 1. body `false`
//! 2. body `true` (not an error: becomes `{"value": true}`)
//! 3. `error` object with `message`/`type` (or a bare string)
//! 4. `error_code` together with `error_msg`
//! 5. `error_code` alone
//! 6. `error_msg` alone
//! 7. `error_reason` alone
//! 8. `unauthorized`, then `ratelimited`
//!
//! Anything else is clean data for a parser.

use serde_json::{json, Value};

use crate::error::{ApiError, Error, Result};
use crate::parsers::{Envelope, JsonObject};

const GENERIC_FAILURE: &str = "request failed";

/// Parse a raw body into JSON, raising the error it signals, if any.
pub fn normalize(body: &str) -> Result<Value> {
    match body.trim() {
        "false" => return Err(ApiError::new(GENERIC_FAILURE).into()),
        "true" => return Ok(json!({ "value": true })),
        _ => {}
    }
    let value: Value = serde_json::from_str(body)?;
    if let Value::Object(object) = &value {
        check_error_fields(object)?;
    }
    Ok(value)
}

fn check_error_fields(json: &JsonObject) -> Result<()> {
    if let Some(error) = json.get("error") {
        return Err(structured_error(error).into());
    }

    let code = json.get("error_code");
    let message = json.get("error_msg").map(text);
    match (code, message) {
        (Some(code), Some(message)) => {
            return Err(ApiError::new(message).with_code(error_code(code)).into());
        }
        (Some(code), None) => {
            return Err(ApiError::new(GENERIC_FAILURE).with_code(error_code(code)).into());
        }
        (None, Some(message)) => return Err(ApiError::new(message).into()),
        (None, None) => {}
    }

    if let Some(reason) = json.get("error_reason") {
        return Err(ApiError::new(text(reason)).into());
    }
    if let Some(reason) = json.get("unauthorized") {
        return Err(Error::Credentials(text(reason)));
    }
    if let Some(reason) = json.get("ratelimited") {
        return Err(Error::RateLimited(text(reason)));
    }
    Ok(())
}

fn structured_error(error: &Value) -> ApiError {
    match error {
        Value::Object(details) => {
            let message = details.get("message").map(text).unwrap_or_else(|| GENERIC_FAILURE.to_string());
            ApiError::new(message).with_kind(details.get("type").map(text))
        }
        other => ApiError::new(text(other)),
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Codes arrive as numbers or numeric strings; anything else is dropped.
fn error_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Strip the single-key envelope around a payload: `{"venue": {...}}` yields
/// the venue object and `{"categories": [...]}` the array. Objects with
/// several keys, or whose only value is a scalar, are already the payload.
/// With `Envelope::Key` only that key is stripped.
pub fn unwrap_payload(value: Value, envelope: Envelope) -> Value {
    match value {
        Value::Object(object) if is_envelope(&object, envelope) => object
            .into_iter()
            .next()
            .map(|(_, inner)| inner)
            .unwrap_or_default(),
        other => other,
    }
}

fn is_envelope(object: &JsonObject, envelope: Envelope) -> bool {
    let Some((key, inner)) = object.iter().next() else {
        return false;
    };
    let wraps = object.len() == 1 && (inner.is_object() || inner.is_array());
    match envelope {
        Envelope::Any => wraps,
        Envelope::Key(expected) => wraps && key == expected,
    }
}
