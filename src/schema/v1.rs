//! First revision: limits given as a `[min, max]` pair, grouped under
//! `rootRequirementGenerationPreferences`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::shape::{FieldShapes, Shape};

pub(super) const FIELDS: FieldShapes =
    &[("rootRequirementGenerationPreferences", Shape::Object(PREFERENCE_FIELDS))];

const PREFERENCE_FIELDS: FieldShapes = &[
    ("brd", Shape::Object(LIMIT_FIELDS)),
    ("prd", Shape::Object(LIMIT_FIELDS)),
    ("nfr", Shape::Object(LIMIT_FIELDS)),
    ("uir", Shape::Object(LIMIT_FIELDS)),
];

const LIMIT_FIELDS: FieldShapes = &[("generationCountRange", Shape::IntList)];

/// Generation limit expressed as a two-element integer range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RequirementGenerationLimit {
    /// `[min, max]`; exactly two entries.
    #[serde(rename = "generationCountRange")]
    #[validate(required, length(equal = 2))]
    pub generation_count_range: Option<Vec<i64>>,
}

/// Per-category limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RootRequirementGenerationPreferences {
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

/// Create-solution payload, revision 1.
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
    /// Limits for the four document categories.
    #[serde(rename = "rootRequirementGenerationPreferences")]
    #[validate(required, nested)]
    pub root_requirement_generation_preferences: Option<RootRequirementGenerationPreferences>,
}
