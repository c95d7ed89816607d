//! Defensive field readers shared by the record parsers.
//!
//! A missing key or a `null` value yields `Ok(None)`. A present value of the
//! wrong kind yields `ParseError::InvalidField`. Numeric and boolean fields
//! also accept their string renderings, since the server quotes them
//! inconsistently.

use serde_json::{Map, Value};

use super::{GroupParser, Parser};
use crate::error::ParseError;
use crate::types::Group;

pub type JsonObject = Map<String, Value>;

fn present<'a>(json: &'a JsonObject, key: &str) -> Option<&'a Value> {
    json.get(key).filter(|value| !value.is_null())
}

fn invalid(key: &str, expected: &'static str) -> ParseError {
    ParseError::InvalidField {
        field: key.to_string(),
        expected,
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub(crate) fn string(json: &JsonObject, key: &str) -> Result<Option<String>, ParseError> {
    match present(json, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(invalid(key, "a string")),
    }
}

pub(crate) fn int(json: &JsonObject, key: &str) -> Result<Option<i64>, ParseError> {
    match present(json, key) {
        None => Ok(None),
        Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(|| invalid(key, "an integer")),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(key, "an integer")),
        Some(_) => Err(invalid(key, "an integer")),
    }
}

pub(crate) fn float(json: &JsonObject, key: &str) -> Result<Option<f64>, ParseError> {
    match present(json, key) {
        None => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| invalid(key, "a number")),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(key, "a number")),
        Some(_) => Err(invalid(key, "a number")),
    }
}

/// Booleans arrive as JSON booleans, `"1"`/`"0"`, `"true"`/`"false"` or
/// `1`/`0`.
pub(crate) fn boolean(json: &JsonObject, key: &str) -> Result<Option<bool>, ParseError> {
    let Some(value) = present(json, key) else {
        return Ok(None);
    };
    let coerced = match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.as_str() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        },
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        _ => None,
    };
    coerced.map(Some).ok_or_else(|| invalid(key, "a boolean"))
}

pub(crate) fn nested<P: Parser>(json: &JsonObject, key: &str, parser: &P) -> Result<Option<P::Output>, ParseError> {
    present(json, key).map(|value| parser.parse(value)).transpose()
}

pub(crate) fn boxed<P: Parser>(
    json: &JsonObject,
    key: &str,
    parser: &P,
) -> Result<Option<Box<P::Output>>, ParseError> {
    Ok(nested(json, key, parser)?.map(Box::new))
}

pub(crate) fn group<P: Parser>(
    json: &JsonObject,
    key: &str,
    parser: P,
) -> Result<Option<Group<P::Output>>, ParseError> {
    nested(json, key, &GroupParser::new(parser))
}
