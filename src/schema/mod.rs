//! Request schemas for the solution resource.
//!
//! Three revisions of the create-solution payload coexist. They share the
//! scalar top-level fields and differ in the shape of the per-category
//! generation limit (`brd`, `prd`, `nfr`, `uir`); revision 1 also nests the
//! four limits under `rootRequirementGenerationPreferences`. Validation
//! reports every field-level violation at once, mistyped fields included.

mod shape;
pub mod v1;
pub mod v2;
pub mod v3;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use shape::{FieldShapes, Shape};

/// Revision of the create-solution schema to validate against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    /// `generationCountRange: [min, max]` under the root preferences.
    V1,
    /// `min_count >= 1`, `max_count >= 30`
    V2,
    /// `max_count` only.
    #[default]
    V3,
}

impl SchemaVersion {
    /// Revision used when the caller does not pick one.
    pub const CURRENT: Self = Self::V3;
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => f.write_str("v1"),
            Self::V2 => f.write_str("v2"),
            Self::V3 => f.write_str("v3"),
        }
    }
}

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted path to the field, e.g. `brd.max_count`.
    pub path: String,
    /// Constraint code: `required`, `length`, `range`, `type`, `datetime`.
    pub code: String,
}

/// Every violation found in a payload, sorted by path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// The individual violations.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Paths of all offending fields.
    #[must_use]
    pub fn paths(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.path.as_str()).collect()
    }

    /// Whether `path` has at least one violation.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.0.iter().any(|e| e.path == path)
    }
}

impl From<Vec<FieldError>> for FieldErrors {
    fn from(mut errors: Vec<FieldError>) -> Self {
        errors.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.code.cmp(&b.code)));
        Self(errors)
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut out = Vec::new();
        flatten("", errors, &mut out);
        Self::from(out)
    }
}

fn flatten(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path =
            if prefix.is_empty() { field.to_string() } else { format!("{prefix}.{field}") };
        match kind {
            ValidationErrorsKind::Field(list) => out.extend(
                list.iter().map(|e| FieldError { path: path.clone(), code: e.code.to_string() }),
            ),
            ValidationErrorsKind::Struct(inner) => flatten(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", error.path, error.code)?;
        }
        Ok(())
    }
}

/// Rejected payload.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Not a JSON object.
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Structurally sound but violating field constraints.
    #[error("validation failed: {0}")]
    Invalid(FieldErrors),
}

impl SchemaError {
    /// Field-level violations, if this is a constraint failure.
    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            Self::Malformed(_) => None,
        }
    }
}

/// A create-solution payload accepted by one of the revisions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ValidatedSolution {
    /// Accepted by revision 1.
    V1(v1::CreateSolutionRequest),
    /// Accepted by revision 2.
    V2(v2::CreateSolutionRequest),
    /// Accepted by revision 3.
    V3(v3::CreateSolutionRequest),
}

impl ValidatedSolution {
    /// Revision that accepted the payload.
    #[must_use]
    pub fn version(&self) -> SchemaVersion {
        match self {
            Self::V1(_) => SchemaVersion::V1,
            Self::V2(_) => SchemaVersion::V2,
            Self::V3(_) => SchemaVersion::V3,
        }
    }

    /// Solution name.
    #[must_use]
    pub fn name(&self) -> &str {
        let name = match self {
            Self::V1(r) => &r.name,
            Self::V2(r) => &r.name,
            Self::V3(r) => &r.name,
        };
        name.as_deref().unwrap_or_default()
    }
}

/// Reference to an existing solution, used by lookup and delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SolutionIdReference {
    /// Solution identifier.
    #[validate(required)]
    pub id: Option<String>,
}

const ID_FIELDS: FieldShapes = &[("id", Shape::Str)];

/// Type-checks against `tables`, deserialises what is left, then validates.
/// Type errors and constraint errors are reported together; a constraint
/// error on a field that was already mistyped is dropped.
fn parse<T>(payload: &Value, tables: &[FieldShapes]) -> Result<T, SchemaError>
where
    T: DeserializeOwned + Validate,
{
    let mut payload = payload.clone();
    let mut type_errors = Vec::new();
    if let Value::Object(object) = &mut payload {
        for fields in tables {
            shape::strip_mistyped(object, fields, "", &mut type_errors);
        }
    }

    let parsed: T = serde_json::from_value(payload)?;
    let mut errors = match parsed.validate() {
        Ok(()) => Vec::new(),
        Err(e) => FieldErrors::from(&e).0,
    };
    errors.retain(|e| !type_errors.iter().any(|t| t.path == e.path));
    errors.extend(type_errors);

    if errors.is_empty() {
        Ok(parsed)
    } else {
        Err(SchemaError::Invalid(FieldErrors::from(errors)))
    }
}

/// Validates a create-solution payload against `version`.
///
/// # Errors
///
/// Returns [`SchemaError::Malformed`] when the payload is not a JSON object
/// and [`SchemaError::Invalid`] listing every type and constraint violation.
pub fn validate_solution(
    version: SchemaVersion,
    payload: &Value,
) -> Result<ValidatedSolution, SchemaError> {
    match version {
        SchemaVersion::V1 => {
            parse(payload, &[shape::COMMON_FIELDS, v1::FIELDS]).map(ValidatedSolution::V1)
        }
        SchemaVersion::V2 => {
            parse(payload, &[shape::COMMON_FIELDS, v2::FIELDS]).map(ValidatedSolution::V2)
        }
        SchemaVersion::V3 => {
            parse(payload, &[shape::COMMON_FIELDS, v3::FIELDS]).map(ValidatedSolution::V3)
        }
    }
}

/// Validates an `{ "id": ... }` payload.
///
/// # Errors
///
/// Returns [`SchemaError`] when `id` is missing or not a string.
pub fn validate_solution_id(payload: &Value) -> Result<SolutionIdReference, SchemaError> {
    parse(payload, &[ID_FIELDS])
}

mod datetime {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    /// Offset-less layouts, read as UTC. Seconds may be omitted and the date
    /// may be separated from the time by `T` or a space.
    const NAIVE_FORMATS: [&str; 4] =
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

    /// Parses an RFC 3339 timestamp or one of the offset-less ISO 8601 layouts.
    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| naive.and_utc())
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        parse(&raw).map(Some).ok_or_else(|| D::Error::custom(format!("invalid datetime {raw:?}")))
    }
}
