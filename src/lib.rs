//! AutoDiag Library
//!
//! Vehicle diagnostic relay: client requests in, Gemini prompts out, validated
//! JSON back.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use services::llm::{LLMError, LLMService, LLMServiceImpl};
pub use services::{DiagnosticError, DiagnosticService};

// Room for the non-file form fields and multipart framing
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application shared state
///
/// Immutable after startup; every request works on its own data.
#[derive(Clone)]
pub struct AppState {
    pub diagnostic_service: Arc<DiagnosticService>,
}

impl AppState {
    pub fn new(llm_service: Arc<dyn LLMService>) -> Self {
        Self { diagnostic_service: Arc::new(DiagnosticService::new(llm_service)) }
    }
}

/// API routes without the outer CORS/trace/docs layers
pub fn api_router(state: Arc<AppState>, max_image_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/diagnose/conversation", post(handlers::diagnose::diagnose_from_conversation))
        .route("/diagnose/image", post(handlers::diagnose::diagnose_from_image))
        .route(
            "/vehicle/identify-from-image",
            post(handlers::vehicle::identify_vehicle_from_image),
        )
        .route(
            "/vehicle/identify-from-text",
            post(handlers::vehicle::identify_vehicle_from_text),
        )
        .layer(DefaultBodyLimit::max(max_image_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES)))
        .with_state(state)
}

#[cfg(test)]
mod tests;
