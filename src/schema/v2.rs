//! Second revision: explicit `min_count` / `max_count` bounds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::shape::{FieldShapes, Shape};

/// Expected JSON types of the revision-specific fields.
pub(super) const FIELDS: FieldShapes = &[
    ("brd", Shape::Object(LIMIT_FIELDS)),
    ("prd", Shape::Object(LIMIT_FIELDS)),
    ("nfr", Shape::Object(LIMIT_FIELDS)),
    ("uir", Shape::Object(LIMIT_FIELDS)),
];

const LIMIT_FIELDS: FieldShapes = &[("min_count", Shape::Int), ("max_count", Shape::Int)];

/// Generation limit with lower and upper bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RequirementGenerationLimit {
    /// Fewest requirements to generate; at least 1.
    #[validate(required, range(min = 1))]
    pub min_count: Option<i64>,
    /// Most requirements to generate; at least 30.
    #[validate(required, range(min = 30))]
    pub max_count: Option<i64>,
}

/// Create-solution payload, revision 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateSolutionRequest {
    /// Solution name.
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    /// Free-form description.
    #[validate(required, length(min = 1))]
    pub description: Option<String>,
    /// Include frontend requirements.
    pub frontend: Option<bool>,
    /// Include backend requirements.
    pub backend: Option<bool>,
    /// Include database requirements.
    pub database: Option<bool>,
    /// Include deployment requirements.
    pub deployment: Option<bool>,
    /// Generate requirements on creation.
    #[serde(rename = "createReqt")]
    pub create_reqt: Option<bool>,
    /// Creation timestamp.
    #[serde(default, deserialize_with = "super::datetime::deserialize")]
    #[validate(required)]
    pub created_on: Option<DateTime<Utc>>,
    /// Business requirements limit.
    #[validate(required, nested)]
    pub brd: Option<RequirementGenerationLimit>,
    /// Product requirements limit.
    #[validate(required, nested)]
    pub prd: Option<RequirementGenerationLimit>,
    /// Non-functional requirements limit.
    #[validate(required, nested)]
    pub nfr: Option<RequirementGenerationLimit>,
    /// UI requirements limit.
    #[validate(required, nested)]
    pub uir: Option<RequirementGenerationLimit>,
}
