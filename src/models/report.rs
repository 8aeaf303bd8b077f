use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Structured diagnosis returned by the assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DiagnosticReport {
    pub potential_problems: Vec<Problem>,
    pub severity: Severity,
    pub next_steps: Vec<String>,
    pub estimated_cost: EstimatedCost,
    pub disclaimers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Problem {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Severity {
    pub level: SeverityLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeverityLevel {
    Critical,
    Caution,
    Information,
}

impl SeverityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Caution => "CAUTION",
            Self::Information => "INFORMATION",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EstimatedCost {
    pub range: String,
    pub disclaimer: String,
}
