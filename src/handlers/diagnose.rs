//! Diagnosis endpoints

use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::MultipartRejection,
        rejection::JsonRejection,
    },
};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::AppState;
use crate::models::{ConversationTurnRequest, DiagnosticReport, Vehicle};
use crate::services::llm::ImageAttachment;
use crate::utils::{ApiResult, MultipartForm};

/// Multipart body of `POST /diagnose/image` (documentation only)
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct DiagnoseImageForm {
    make: String,
    model: String,
    year: i32,
    prompt: String,
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// Diagnose from the conversation so far
#[utoipa::path(
    post,
    path = "/diagnose/conversation",
    request_body = ConversationTurnRequest,
    responses(
        (status = 200, description = "Diagnostic report", body = DiagnosticReport),
        (status = 422, description = "Invalid request body", body = ErrorResponse),
        (status = 500, description = "Assistant failed or returned a malformed report", body = ErrorResponse),
    ),
    tag = "Diagnosis"
)]
pub async fn diagnose_from_conversation(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ConversationTurnRequest>, JsonRejection>,
) -> ApiResult<Json<DiagnosticReport>> {
    let Json(req) = payload?;

    let report = state
        .diagnostic_service
        .diagnose_conversation(&req.vehicle, &req.history)
        .await?;

    Ok(Json(report))
}

/// Diagnose from a question and a photo
#[utoipa::path(
    post,
    path = "/diagnose/image",
    request_body(content = DiagnoseImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Diagnostic report", body = DiagnosticReport),
        (status = 400, description = "Upload is not a supported image", body = ErrorResponse),
        (status = 422, description = "Missing or invalid form field", body = ErrorResponse),
        (status = 500, description = "Assistant failed or returned a malformed report", body = ErrorResponse),
    ),
    tag = "Diagnosis"
)]
pub async fn diagnose_from_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<DiagnosticReport>> {
    let mut form = MultipartForm::read(multipart?).await?;

    let vehicle = Vehicle::new(form.text("make")?, form.text("model")?, form.integer("year")?);
    let question = form.text("prompt")?.to_string();
    let image = ImageAttachment::decode(form.take_file("file")?).await?;

    let report = state
        .diagnostic_service
        .diagnose_image(&vehicle, &question, image)
        .await?;

    Ok(Json(report))
}
