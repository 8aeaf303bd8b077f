//! Prompt scenarios
//!
//! Each scenario pairs a fixed instruction template with the request-specific
//! user content it is sent alongside.

pub mod diagnosis;
pub mod identification;

use super::models::{ContentPart, LLMRequest, LLMScenario};

const DIAGNOSIS_PROMPT: &str = include_str!("prompts/diagnosis.md");
const VIN_IDENTIFICATION_PROMPT: &str = include_str!("prompts/vin_identification.md");
const TEXT_IDENTIFICATION_PROMPT: &str = include_str!("prompts/text_identification.md");

impl LLMScenario {
    /// Instruction template sent as the system directive
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Self::ConversationDiagnosis | Self::ImageDiagnosis => DIAGNOSIS_PROMPT,
            Self::VinIdentification => VIN_IDENTIFICATION_PROMPT,
            Self::TextIdentification => TEXT_IDENTIFICATION_PROMPT,
        }
    }
}

/// Implemented by each scenario's input
pub trait LLMPrompt: Sized {
    fn scenario(&self) -> LLMScenario;

    /// Ordered user-level content
    fn into_parts(self) -> Vec<ContentPart>;

    fn into_request(self) -> LLMRequest {
        let scenario = self.scenario();
        LLMRequest { scenario, system_prompt: scenario.system_prompt(), parts: self.into_parts() }
    }
}
