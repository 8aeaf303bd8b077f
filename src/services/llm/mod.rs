//! LLM Service Module
//!
//! Gateway to the Gemini API. Every diagnostic operation goes through here.
//!
//! # Architecture
//! ```text
//! ┌──────────────────┐
//! │  LLMPrompt impls │  ← scenario input → LLMRequest
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │    LLMService    │  ← Trait (fake in tests)
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │    LLMClient     │  ← generateContent over HTTP
//! └──────────────────┘
//! ```

mod client;
mod models;
mod scenarios;
mod service;

pub use client::LLMClient;
pub use models::*;
pub use scenarios::LLMPrompt;
pub use scenarios::diagnosis::{ConversationDiagnosisPrompt, ImageDiagnosisPrompt};
pub use scenarios::identification::{TextIdentificationPrompt, VinIdentificationPrompt};
pub use service::{LLMService, LLMServiceImpl, extract_json, strip_code_fences};

#[cfg(test)]
pub(crate) mod sample_images;
