use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("OCR service is not configured: missing or placeholder API key")]
    NotConfigured,

    #[error("OCR service unreachable: {0}")]
    NetworkUnavailable(String),

    #[error("OCR provider error: {0}")]
    ProviderError(String),

    #[error("No text detected in the image")]
    NoTextDetected,

    #[error("No player names could be extracted from the image")]
    NoPlayersFound,

    #[error("Failed to initialize OCR client: {0}")]
    InitializationError(String),

    #[error("Unsupported upload format: {0}")]
    UnsupportedFormat(String),

    #[error("Image too large: {size} bytes (max: {max} bytes)")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Missing file in request")]
    MissingFile,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl OcrError {
    /// Guidance shown to the user alongside the error, when there is any.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            OcrError::NotConfigured => {
                Some("Set OCR_SPACE_API_KEY to a valid OCR.space key and restart the server.")
            }
            OcrError::NetworkUnavailable(_) => {
                Some("Check your internet connection and try again in a moment.")
            }
            OcrError::ProviderError(_) => {
                Some("The OCR provider rejected the request; try again or use a smaller image.")
            }
            OcrError::NoTextDetected => Some(
                "Upload a clearer, uncropped screenshot of the team page with player names visible.",
            ),
            OcrError::NoPlayersFound => {
                Some("Make sure the screenshot shows the selected team, or enter the players manually.")
            }
            OcrError::UnsupportedFormat(_) => Some("Upload a PNG or JPEG screenshot."),
            _ => None,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl IntoResponse for OcrError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            OcrError::NotConfigured => (StatusCode::SERVICE_UNAVAILABLE, "NOT_CONFIGURED"),
            OcrError::NetworkUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "NETWORK_UNAVAILABLE")
            }
            OcrError::ProviderError(_) => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR"),
            OcrError::NoTextDetected => (StatusCode::UNPROCESSABLE_ENTITY, "NO_TEXT_DETECTED"),
            OcrError::NoPlayersFound => (StatusCode::UNPROCESSABLE_ENTITY, "NO_PLAYERS_FOUND"),
            OcrError::InitializationError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INIT_ERROR"),
            OcrError::UnsupportedFormat(_) => (StatusCode::BAD_REQUEST, "UNSUPPORTED_FORMAT"),
            OcrError::ImageTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "IMAGE_TOO_LARGE"),
            OcrError::MissingFile => (StatusCode::BAD_REQUEST, "MISSING_FILE"),
            OcrError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
            suggestion: self.suggestion().map(str::to_string),
        });

        (status, body).into_response()
    }
}
