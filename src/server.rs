use crate::config::Config;
use crate::engines::EngineInfo;
use crate::error::OcrError;
use crate::extraction::{
    self, passes::PassReport, Extraction, ExtractionResult, EXPECTED_PLAYERS,
    MIN_CONFIDENT_PLAYERS,
};
use crate::orchestrator::Orchestrator;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, DefaultBodyLimit, Multipart, State},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Room for multipart framing on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub config: Arc<Config>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractStatus {
    Complete,
    Partial,
}

/// Extraction response
#[derive(Serialize)]
pub struct ExtractResponse {
    pub status: ExtractStatus,
    #[serde(flatten)]
    pub result: ExtractionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Engine whose text was used; absent for text replays
    pub engine: Option<u8>,
    pub passes: Vec<PassReport>,
    pub processing_time_ms: u64,
}

/// Raw OCR text to run through the extraction pipeline
#[derive(Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Server info response
#[derive(Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub engines: Vec<EngineInfo>,
    pub ocr_configured: bool,
    pub early_exit_chars: usize,
    pub max_file_size_bytes: usize,
    pub expected_players: usize,
    pub min_confident_players: usize,
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(config.ocr.clone())?;
    let addr = format!("{}:{}", config.host, config.port);

    let state = AppState {
        orchestrator: Arc::new(orchestrator),
        config: Arc::new(config),
    };

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, router(state)).await?;

    Ok(())
}

/// Build the router with all routes and layers
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_file_size + MULTIPART_OVERHEAD;

    Router::new()
        .route("/extract", post(handle_extract))
        .route("/extract/text", post(handle_extract_text))
        .route("/health", get(handle_health))
        .route("/info", get(handle_info))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Handle screenshot uploads
async fn handle_extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, OcrError> {
    let start = Instant::now();

    let mut file_data: Option<Bytes> = None;
    let mut content_type: Option<String> = None;

    // Parse multipart form
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| OcrError::InvalidRequest(format!("Failed to parse multipart: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            content_type = field.content_type().map(|s| s.to_string());
            file_data = Some(field.bytes().await.map_err(|e| {
                OcrError::InvalidRequest(format!("Failed to read file data: {}", e))
            })?);
        }
    }

    // Validate file was provided
    let data = file_data.ok_or(OcrError::MissingFile)?;
    if data.is_empty() {
        return Err(OcrError::MissingFile);
    }

    // Check file size
    if data.len() > state.config.max_file_size {
        return Err(OcrError::ImageTooLarge {
            size: data.len(),
            max: state.config.max_file_size,
        });
    }

    ensure_image(content_type.as_deref(), &data)?;

    let raw = state.orchestrator.recognize(&data).await?;
    let extraction = extraction::extract(&raw.text)?;

    respond(extraction, Some(raw.engine_id), start)
}

/// Handle raw-text replays
async fn handle_extract_text(
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<ExtractResponse>, OcrError> {
    let start = Instant::now();
    let Json(request) = payload.map_err(|e| OcrError::InvalidRequest(e.body_text()))?;

    let extraction = extraction::extract(&request.text)?;
    respond(extraction, None, start)
}

/// Reject uploads that are not images, by declared type and by signature
fn ensure_image(content_type: Option<&str>, data: &[u8]) -> Result<(), OcrError> {
    if let Some(mime) = content_type {
        if !mime.starts_with("image/") && mime != "application/octet-stream" {
            return Err(OcrError::UnsupportedFormat(mime.to_string()));
        }
    }

    let format = image::guess_format(data)
        .map_err(|_| OcrError::UnsupportedFormat("unrecognized image data".to_string()))?;
    tracing::debug!("Upload detected as {:?}", format);

    Ok(())
}

fn respond(
    extraction: Extraction,
    engine: Option<u8>,
    start: Instant,
) -> Result<Json<ExtractResponse>, OcrError> {
    let Extraction { result, passes } = extraction;

    if result.extracted_count == 0 {
        return Err(OcrError::NoPlayersFound);
    }

    let (status, suggestion) = if result.is_partial() {
        (
            ExtractStatus::Partial,
            Some(format!(
                "Only {} of {} players were recognized. Add the missing players manually.",
                result.extracted_count, EXPECTED_PLAYERS
            )),
        )
    } else {
        (ExtractStatus::Complete, None)
    };

    let processing_time_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        "Extraction completed in {}ms: {}/{} players ({:?})",
        processing_time_ms,
        result.extracted_count,
        EXPECTED_PLAYERS,
        status
    );

    Ok(Json(ExtractResponse {
        status,
        result,
        suggestion,
        engine,
        passes,
        processing_time_ms,
    }))
}

/// Handle health check requests
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle info requests
async fn handle_info(State(state): State<AppState>) -> impl IntoResponse {
    let settings = state.orchestrator.settings();
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        engines: state.orchestrator.registry().info(),
        ocr_configured: settings.is_configured(),
        early_exit_chars: settings.early_exit_chars,
        max_file_size_bytes: state.config.max_file_size,
        expected_players: EXPECTED_PLAYERS,
        min_confident_players: MIN_CONFIDENT_PLAYERS,
    })
}
