//! Vehicle identification scenarios - VIN photo or free-form text

use super::LLMPrompt;
use crate::services::llm::models::{ContentPart, ImageAttachment, LLMScenario};

#[derive(Debug, Clone)]
pub struct VinIdentificationPrompt {
    pub image: ImageAttachment,
}

impl LLMPrompt for VinIdentificationPrompt {
    fn scenario(&self) -> LLMScenario {
        LLMScenario::VinIdentification
    }

    // The instruction carries everything; the image is the whole user turn
    fn into_parts(self) -> Vec<ContentPart> {
        vec![ContentPart::Image(self.image)]
    }
}

#[derive(Debug, Clone)]
pub struct TextIdentificationPrompt<'a> {
    pub query: &'a str,
}

impl LLMPrompt for TextIdentificationPrompt<'_> {
    fn scenario(&self) -> LLMScenario {
        LLMScenario::TextIdentification
    }

    fn into_parts(self) -> Vec<ContentPart> {
        vec![ContentPart::text(self.query)]
    }
}
