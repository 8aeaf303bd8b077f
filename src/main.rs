use axum::{Router, http::HeaderValue};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use autodiag::config::{Config, CorsConfig, LoggingConfig};
use autodiag::{AppState, LLMServiceImpl, handlers, models};

#[derive(OpenApi)]
#[openapi(
    info(title = "Vehicle Diagnostic Assistant API", version = "1.0.0"),
    paths(
        handlers::health::health_check,
        handlers::diagnose::diagnose_from_conversation,
        handlers::diagnose::diagnose_from_image,
        handlers::vehicle::identify_vehicle_from_image,
        handlers::vehicle::identify_vehicle_from_text,
    ),
    components(
        schemas(
            models::Vehicle,
            models::Role,
            models::HistoryTurn,
            models::ConversationTurnRequest,
            models::VehicleTextRequest,
            models::DiagnosticReport,
            models::Problem,
            models::Severity,
            models::SeverityLevel,
            models::EstimatedCost,
            models::ErrorResponse,
            models::HealthResponse,
            handlers::diagnose::DiagnoseImageForm,
            handlers::vehicle::VinImageForm,
        )
    ),
    tags(
        (name = "Diagnosis", description = "LLM-backed vehicle diagnosis"),
        (name = "Vehicle", description = "Vehicle identification"),
        (name = "System", description = "Service health"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // The real subscriber needs the config, so config loading logs to stdout
    let bootstrap = tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).finish();
    let config = tracing::subscriber::with_default(bootstrap, Config::load)?;

    // Held for the life of the process so buffered file logs get flushed
    let _log_guard = init_logging(&config.logging);
    tracing::info!("AutoDiag starting up");
    tracing::info!("Configuration loaded successfully");
    config.log_startup_warnings();
    tracing::info!(
        "LLM model: {} (timeout: {})",
        config.llm.model_name,
        config
            .llm
            .timeout_secs
            .map(|s| format!("{}s", s))
            .unwrap_or_else(|| "transport default".to_string())
    );

    let llm_service = Arc::new(LLMServiceImpl::new(&config.llm)?);
    tracing::info!("LLM service initialized");

    let app_state = Arc::new(AppState::new(llm_service));

    let app = Router::new()
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(autodiag::api_router(app_state, config.upload.max_image_bytes))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("API documentation available at http://{}/api-docs", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let log_filter = tracing_subscriber::EnvFilter::new(&logging.level);
    let registry = tracing_subscriber::registry().with(log_filter);

    let Some(log_file) = &logging.file else {
        registry.with(tracing_subscriber::fmt::layer()).init();
        return None;
    };

    let log_path = std::path::Path::new(log_file);
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_dir = log_path
        .parent()
        .and_then(|p| p.to_str())
        .filter(|p| !p.is_empty())
        .unwrap_or("logs");
    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("autodiag.log");
    // Rolling appender adds its own date suffix
    let file_prefix = file_name.strip_suffix(".log").unwrap_or(file_name);

    let file_appender = tracing_appender::rolling::daily(log_dir, file_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    registry
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(tracing_subscriber::fmt::layer())
        .init();

    Some(guard)
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            },
        })
        .collect();

    // Credentials rule out wildcards, so methods and headers are mirrored instead
    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
