//! Shape checks for desire arguments.
//!
//! Typed requests only need the value checks (`check_request`). Arguments that
//! arrive as untyped JSON go through `request_from_value` / `id_from_value`
//! first, which reject wrongly-typed fields by name.

use serde_json::{Map, Value};

use super::types::{DesireRequest, DEFAULT_INTENSITY, DEFAULT_UTILITY};
use crate::error::{IwError, Result};

const KNOWN_FIELDS: &[&str] = &["type", "id", "intensity", "utility", "params", "security"];

pub fn check_request(request: &DesireRequest) -> Result<()> {
    if request.desire_type.is_empty() {
        return Err(IwError::invalid("type", "must not be empty"));
    }
    if !request.intensity.is_finite() {
        return Err(IwError::invalid("intensity", "must be a finite number"));
    }
    if !request.utility.is_finite() {
        return Err(IwError::invalid("utility", "must be a finite number"));
    }
    Ok(())
}

/// Builds a `DesireRequest` from an untyped JSON object.
pub fn request_from_value(value: &Value) -> Result<DesireRequest> {
    let obj = value
        .as_object()
        .ok_or_else(|| IwError::invalid("request", "is not an object"))?;

    if let Some(unknown) = obj.keys().find(|k| !KNOWN_FIELDS.contains(&k.as_str())) {
        return Err(IwError::invalid("request", format!("unknown field `{}`", unknown)));
    }

    let desire_type = match obj.get("type") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => return Err(wrong_type("type", "a string", other)),
        None => return Err(IwError::invalid("type", "is required")),
    };

    let mut request = DesireRequest::new(desire_type)
        .with_intensity(real_field(obj, "intensity", DEFAULT_INTENSITY)?)
        .with_utility(real_field(obj, "utility", DEFAULT_UTILITY)?);

    match obj.get("params") {
        Some(Value::Object(params)) => request.params = params.clone(),
        Some(other) => return Err(wrong_type("params", "an object", other)),
        None => {}
    }

    match obj.get("security") {
        Some(Value::Bool(b)) => request.security = *b,
        Some(other) => return Err(wrong_type("security", "a bool", other)),
        None => {}
    }

    match obj.get("id") {
        Some(Value::String(s)) => request.id = Some(s.clone()),
        Some(other) => return Err(wrong_type("id", "a string", other)),
        None => {}
    }

    Ok(request)
}

pub fn id_from_value(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(wrong_type("id", "a string", other)),
    }
}

fn real_field(obj: &Map<String, Value>, field: &'static str, default: f64) -> Result<f64> {
    match obj.get(field) {
        // Integers are accepted as reals.
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| IwError::invalid(field, "is not representable as f64")),
        Some(other) => Err(wrong_type(field, "a number", other)),
        None => Ok(default),
    }
}

fn wrong_type(field: &'static str, expected: &str, got: &Value) -> IwError {
    IwError::invalid(field, format!("expected {}, got {}", expected, kind_of(got)))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
