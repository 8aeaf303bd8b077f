pub mod report;
pub mod schema;
pub mod vehicle;

pub use report::*;
pub use schema::{Schema, SchemaValidationError, validate};
pub use vehicle::*;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Uniform failure body returned in place of a report or vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self { status: "ok".to_string(), message: "API is running!".to_string() }
    }
}
