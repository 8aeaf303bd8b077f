//! Vehicle identification endpoints

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
use crate::models::{Vehicle, VehicleTextRequest};
use crate::services::llm::ImageAttachment;
use crate::utils::{ApiResult, MultipartForm};

/// Multipart body of `POST /vehicle/identify-from-image` (documentation only)
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct VinImageForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// Read the VIN sticker in a photo and decode it
#[utoipa::path(
    post,
    path = "/vehicle/identify-from-image",
    request_body(content = VinImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Identified vehicle", body = Vehicle),
        (status = 400, description = "Upload is not a supported image", body = ErrorResponse),
        (status = 422, description = "Missing file upload", body = ErrorResponse),
        (status = 500, description = "Assistant failed or returned malformed vehicle data", body = ErrorResponse),
    ),
    tag = "Vehicle"
)]
pub async fn identify_vehicle_from_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Vehicle>> {
    let mut form = MultipartForm::read(multipart?).await?;
    let image = ImageAttachment::decode(form.take_file("file")?).await?;

    let vehicle = state.diagnostic_service.identify_from_image(image).await?;

    Ok(Json(vehicle))
}

/// Pull make, model and year out of free-form text
#[utoipa::path(
    post,
    path = "/vehicle/identify-from-text",
    request_body = VehicleTextRequest,
    responses(
        (status = 200, description = "Identified vehicle", body = Vehicle),
        (status = 422, description = "Invalid request body", body = ErrorResponse),
        (status = 500, description = "Assistant failed or returned malformed vehicle data", body = ErrorResponse),
    ),
    tag = "Vehicle"
)]
pub async fn identify_vehicle_from_text(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VehicleTextRequest>, JsonRejection>,
) -> ApiResult<Json<Vehicle>> {
    let Json(req) = payload?;

    let vehicle = state.diagnostic_service.identify_from_text(&req.query).await?;

    Ok(Json(vehicle))
}
