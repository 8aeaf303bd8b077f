pub mod diagnostic_service;
pub mod llm;

pub use diagnostic_service::{
    DiagnosticError, DiagnosticService, MALFORMED_REPORT_MESSAGE, MALFORMED_VEHICLE_MESSAGE,
};
pub use llm::{LLMError, LLMService, LLMServiceImpl};
