//! Job categories and locations.

use serde::{Deserialize, Serialize};

/// A job category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: String,
    pub name: String,
    pub description: String,
}

/// Body for creating a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCategoryPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A geographic location a job can be attached to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub location_id: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

/// Body for creating a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateLocationPayload {
    pub city: String,
    pub state: String,
    pub country: String,
}
