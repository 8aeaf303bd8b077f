//! Schema validation for untrusted JSON
//!
//! LLM output is parsed into a loose `serde_json::Value` first and only then
//! checked against the fixed shapes in this module's siblings. A value either
//! converts completely or is rejected; nothing partial is ever returned.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// A value did not match the expected shape
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{shape} validation failed: {violation}")]
pub struct SchemaValidationError {
    pub shape: &'static str,
    pub violation: String,
}

/// Types that can be validated from untyped JSON
pub trait Schema: DeserializeOwned {
    const NAME: &'static str;

    fn validate(value: Value) -> Result<Self, SchemaValidationError> {
        validate::<Self>(value)
    }
}

/// Validate `value` against `T`, reporting the first violation found
pub fn validate<T: Schema>(value: Value) -> Result<T, SchemaValidationError> {
    serde_json::from_value(value)
        .map_err(|e| SchemaValidationError { shape: T::NAME, violation: e.to_string() })
}

impl Schema for super::Vehicle {
    const NAME: &'static str = "Vehicle";
}

impl Schema for super::DiagnosticReport {
    const NAME: &'static str = "DiagnosticReport";
}
