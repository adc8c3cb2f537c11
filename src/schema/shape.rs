//! JSON type checks run ahead of deserialisation.
//!
//! A mistyped field is reported as a [`FieldError`] and removed from the
//! payload, so the remaining fields still deserialise and every other
//! violation is reported alongside it.

use serde_json::{Map, Value};

use super::{datetime, FieldError};

/// Expected JSON type of a payload field.
#[derive(Debug, Clone, Copy)]
pub(super) enum Shape {
    Str,
    Bool,
    Int,
    DateTime,
    IntList,
    Object(&'static [(&'static str, Shape)]),
}

/// A field name paired with its expected shape.
pub(super) type FieldShapes = &'static [(&'static str, Shape)];

/// Top-level fields shared by every create-solution revision.
pub(super) const COMMON_FIELDS: FieldShapes = &[
    ("name", Shape::Str),
    ("description", Shape::Str),
    ("frontend", Shape::Bool),
    ("backend", Shape::Bool),
    ("database", Shape::Bool),
    ("deployment", Shape::Bool),
    ("createReqt", Shape::Bool),
    ("created_on", Shape::DateTime),
];

/// Strips every field of `object` that does not match `fields`, recording
/// one error per field. Nulls count as absent and are left to `required`.
pub(super) fn strip_mistyped(
    object: &mut Map<String, Value>,
    fields: &[(&str, Shape)],
    prefix: &str,
    out: &mut Vec<FieldError>,
) {
    for (name, shape) in fields {
        let Some(value) = object.get_mut(*name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        let path = if prefix.is_empty() { (*name).to_string() } else { format!("{prefix}.{name}") };

        if let (Shape::Object(inner), Value::Object(nested)) = (shape, &mut *value) {
            strip_mistyped(nested, inner, &path, out);
            continue;
        }
        if let Some(code) = mismatch(*shape, value) {
            out.push(FieldError { path, code: code.to_string() });
            object.remove(*name);
        }
    }
}

fn mismatch(shape: Shape, value: &Value) -> Option<&'static str> {
    let matches = match shape {
        Shape::Str => value.is_string(),
        Shape::Bool => value.is_boolean(),
        Shape::Int => value.is_i64(),
        Shape::IntList => value.as_array().is_some_and(|items| items.iter().all(Value::is_i64)),
        Shape::Object(_) => value.is_object(),
        Shape::DateTime => {
            let Some(raw) = value.as_str() else {
                return Some("type");
            };
            return datetime::parse(raw).is_none().then_some("datetime");
        }
    };
    (!matches).then_some("type")
}
