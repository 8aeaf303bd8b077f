//! Diagnosis scenarios - conversation text, or a question with a photo

use super::LLMPrompt;
use crate::models::{HistoryTurn, Vehicle};
use crate::services::llm::models::{ContentPart, ImageAttachment, LLMScenario};

const IMAGE_INSTRUCTION: &str = "Analyze the attached image and the user's question, then provide a full diagnostic report in the required JSON format.";

#[derive(Debug, Clone)]
pub struct ConversationDiagnosisPrompt<'a> {
    pub vehicle: &'a Vehicle,
    pub history: &'a [HistoryTurn],
}

impl LLMPrompt for ConversationDiagnosisPrompt<'_> {
    fn scenario(&self) -> LLMScenario {
        LLMScenario::ConversationDiagnosis
    }

    fn into_parts(self) -> Vec<ContentPart> {
        let transcript = self
            .history
            .iter()
            .map(|turn| format!("{}: {}", turn.role.as_str(), turn.content))
            .collect::<Vec<_>>()
            .join("\n");

        vec![ContentPart::Text(format!(
            "Vehicle: {}\nConversation History:\n{}",
            self.vehicle, transcript
        ))]
    }
}

#[derive(Debug, Clone)]
pub struct ImageDiagnosisPrompt<'a> {
    pub vehicle: &'a Vehicle,
    pub question: &'a str,
    pub image: ImageAttachment,
}

impl LLMPrompt for ImageDiagnosisPrompt<'_> {
    fn scenario(&self) -> LLMScenario {
        LLMScenario::ImageDiagnosis
    }

    fn into_parts(self) -> Vec<ContentPart> {
        vec![
            ContentPart::Text(format!("Vehicle: {}\n", self.vehicle)),
            ContentPart::Text(format!("User's question: {}\n\n", self.question)),
            ContentPart::text(IMAGE_INSTRUCTION),
            ContentPart::Image(self.image),
        ]
    }
}
