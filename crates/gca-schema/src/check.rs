//! # Type/Shape Checker
//!
//! Generic routines comparing a JSON value against a registry
//! [`FieldType`]. Every routine returns violations as data; none of them
//! panic or fail.
//!
//! A `null` value is treated exactly like an absent field.

use serde_json::{Map, Value};

use crate::registry::{self, ElementType, FieldSpec, FieldType, SchemaKind, ValidationMode};
use crate::violation::{Violation, ViolationKind};

/// Name of a value's JSON type as used in messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Returns true for JSON integers. Integral floats such as `30.0` are not
/// integers.
pub fn is_integer(value: &Value) -> bool {
    matches!(value, Value::Number(n) if n.is_i64() || n.is_u64())
}

/// Whether `value` has the shape `ty` describes.
///
/// Enum membership is part of the shape: `"Expert"` does not match
/// `OneOf(["Beginner", ...])`. Record contents are not inspected; only the
/// fact that the value is an object.
pub fn shape_matches(value: &Value, ty: FieldType) -> bool {
    match ty {
        FieldType::String => value.is_string(),
        FieldType::Integer => is_integer(value),
        FieldType::Boolean => value.is_boolean(),
        FieldType::Identifier => value.is_string() || is_integer(value),
        FieldType::OneOf(allowed) => value.as_str().is_some_and(|s| allowed.contains(&s)),
        FieldType::Object | FieldType::Record(_) => value.is_object(),
        FieldType::List(elem) => value
            .as_array()
            .is_some_and(|items| items.iter().all(|v| element_matches(v, elem))),
        FieldType::StringOrStringList => match value {
            Value::String(_) => true,
            Value::Array(items) => items.iter().all(Value::is_string),
            _ => false,
        },
        FieldType::Answer => value.is_string() || is_integer(value),
        FieldType::Any => true,
    }
}

fn element_matches(value: &Value, elem: ElementType) -> bool {
    match elem {
        ElementType::String => value.is_string(),
        ElementType::Record(_) => value.is_object(),
        ElementType::Any => true,
    }
}

fn describe_element(elem: ElementType) -> String {
    match elem {
        ElementType::String => "string".to_string(),
        ElementType::Record(kind) => format!("{kind} object"),
        ElementType::Any => "any value".to_string(),
    }
}

/// Check one field value against its registry entry.
///
/// - absent or `null`: empty when optional under `mode`, otherwise one
///   `missing field` violation;
/// - present with the wrong shape: one `wrong type` violation;
/// - enum value outside the allowed set: one violation naming the value
///   and the set;
/// - list with a bad element: one violation naming the first bad index.
pub fn check(value: Option<&Value>, spec: &FieldSpec, mode: ValidationMode, location: &str) -> Vec<Violation> {
    let value = match value {
        Some(v) if !v.is_null() => v,
        _ if spec.is_required(mode) => return vec![Violation::missing_field(location, spec.name)],
        _ => return Vec::new(),
    };

    match spec.ty {
        FieldType::OneOf(allowed) => match value.as_str() {
            Some(s) if allowed.contains(&s) => Vec::new(),
            Some(s) => vec![Violation::new(
                location,
                ViolationKind::InvalidValue,
                format!("invalid {} \"{s}\": expected one of {}", spec.name, allowed.join(", ")),
            )],
            None => vec![Violation::wrong_type(location, spec.name, "string", json_type_name(value))],
        },
        FieldType::List(elem) => match value.as_array() {
            None => vec![Violation::wrong_type(
                location,
                spec.name,
                &spec.ty.describe(),
                json_type_name(value),
            )],
            Some(items) => first_bad_element(items, location, spec.name, elem),
        },
        FieldType::StringOrStringList => match value {
            Value::String(_) => Vec::new(),
            Value::Array(items) => first_bad_element(items, location, spec.name, ElementType::String),
            other => vec![Violation::wrong_type(
                location,
                spec.name,
                &spec.ty.describe(),
                json_type_name(other),
            )],
        },
        ty if shape_matches(value, ty) => Vec::new(),
        ty => vec![Violation::wrong_type(location, spec.name, &ty.describe(), json_type_name(value))],
    }
}

fn first_bad_element(items: &[Value], location: &str, name: &str, elem: ElementType) -> Vec<Violation> {
    items
        .iter()
        .enumerate()
        .find(|(_, v)| !element_matches(v, elem))
        .map(|(i, v)| {
            Violation::wrong_type(
                location,
                &format!("{name}[{i}]"),
                &describe_element(elem),
                json_type_name(v),
            )
        })
        .into_iter()
        .collect()
}

/// Check every registry field of `kind` on one object.
///
/// Only the object itself is checked; nested records are the caller's
/// business. Fields the registry does not know are ignored.
pub fn check_record(
    obj: &Map<String, Value>,
    kind: SchemaKind,
    mode: ValidationMode,
    location: &str,
) -> Vec<Violation> {
    registry::fields(kind)
        .iter()
        .flat_map(|spec| check(obj.get(spec.name), spec, mode, location))
        .collect()
}
