use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Vehicle {
    pub make: String,
    pub model: String,
    #[serde(deserialize_with = "deserialize_year")]
    pub year: i32,
}

impl Vehicle {
    pub fn new(make: impl Into<String>, model: impl Into<String>, year: i32) -> Self {
        Self { make: make.into(), model: model.into(), year }
    }
}

/// Renders as `{year} {make} {model}`, the order used in prompts
impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.year, self.make, self.model)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One turn of the user/assistant conversation, kept in chronological order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HistoryTurn {
    pub role: Role,
    pub content: String,
}

impl HistoryTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ConversationTurnRequest {
    pub vehicle: Vehicle,
    pub history: Vec<HistoryTurn>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VehicleTextRequest {
    pub query: String,
}

// Model years arrive as integers from clients but the LLM sometimes quotes them
// ("2018") or emits a float (2018.0). Anything else is rejected.
fn deserialize_year<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct YearVisitor;

    impl<'de> Visitor<'de> for YearVisitor {
        type Value = i32;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer year")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            i32::try_from(value).map_err(|_| E::custom(format!("year out of range: {}", value)))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            i32::try_from(value).map_err(|_| E::custom(format!("year out of range: {}", value)))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64 {
                Ok(value as i32)
            } else {
                Err(E::custom(format!("year must be a whole number, got {}", value)))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            value
                .trim()
                .parse::<i32>()
                .map_err(|_| E::custom(format!("year is not a valid integer: {:?}", value)))
        }
    }

    deserializer.deserialize_any(YearVisitor)
}
