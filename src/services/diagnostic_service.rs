//! Diagnostic operations
//!
//! Each operation renders its prompt, makes one gateway call, and validates the
//! JSON that comes back. Gateway failures short-circuit before validation.

use std::sync::Arc;

use crate::models::{DiagnosticReport, HistoryTurn, Schema, SchemaValidationError, Vehicle};
use crate::services::llm::{
    ConversationDiagnosisPrompt, GatewayFailure, ImageAttachment, ImageDiagnosisPrompt,
    LLMPrompt, LLMRequest, LLMService, TextIdentificationPrompt, VinIdentificationPrompt,
};

pub const MALFORMED_REPORT_MESSAGE: &str =
    "Diagnostic assistant returned a malformed report. Please try again.";
pub const MALFORMED_VEHICLE_MESSAGE: &str = "The assistant returned malformed vehicle data.";

#[derive(Debug, thiserror::Error)]
pub enum DiagnosticError {
    #[error(transparent)]
    Gateway(#[from] GatewayFailure),

    #[error("Diagnostic assistant returned a malformed report. Please try again.")]
    MalformedReport(#[source] SchemaValidationError),

    #[error("The assistant returned malformed vehicle data.")]
    MalformedVehicle(#[source] SchemaValidationError),
}

pub struct DiagnosticService {
    llm_service: Arc<dyn LLMService>,
}

impl DiagnosticService {
    pub fn new(llm_service: Arc<dyn LLMService>) -> Self {
        Self { llm_service }
    }

    pub async fn diagnose_conversation(
        &self,
        vehicle: &Vehicle,
        history: &[HistoryTurn],
    ) -> Result<DiagnosticReport, DiagnosticError> {
        tracing::info!(
            "Diagnosing from conversation: vehicle='{}', turns={}",
            vehicle,
            history.len()
        );
        let request = ConversationDiagnosisPrompt { vehicle, history }.into_request();
        self.run(request, DiagnosticError::MalformedReport).await
    }

    pub async fn diagnose_image(
        &self,
        vehicle: &Vehicle,
        question: &str,
        image: ImageAttachment,
    ) -> Result<DiagnosticReport, DiagnosticError> {
        tracing::info!(
            "Diagnosing from image: vehicle='{}', mime_type={}, bytes={}",
            vehicle,
            image.mime_type(),
            image.data().len()
        );
        let request = ImageDiagnosisPrompt { vehicle, question, image }.into_request();
        self.run(request, DiagnosticError::MalformedReport).await
    }

    pub async fn identify_from_image(
        &self,
        image: ImageAttachment,
    ) -> Result<Vehicle, DiagnosticError> {
        tracing::info!(
            "Identifying vehicle from VIN image: mime_type={}, bytes={}",
            image.mime_type(),
            image.data().len()
        );
        let request = VinIdentificationPrompt { image }.into_request();
        self.run(request, DiagnosticError::MalformedVehicle).await
    }

    pub async fn identify_from_text(&self, query: &str) -> Result<Vehicle, DiagnosticError> {
        tracing::info!("Identifying vehicle from text: '{}'", query);
        let request = TextIdentificationPrompt { query }.into_request();
        self.run(request, DiagnosticError::MalformedVehicle).await
    }

    async fn run<T: Schema>(
        &self,
        request: LLMRequest,
        malformed: fn(SchemaValidationError) -> DiagnosticError,
    ) -> Result<T, DiagnosticError> {
        let scenario = request.scenario;
        let value = self.llm_service.generate_json(request).await?;

        T::validate(value).map_err(|e| {
            tracing::warn!("Failed to validate LLM response for {}: {}", scenario.as_str(), e);
            malformed(e)
        })
    }
}
