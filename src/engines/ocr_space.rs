//! OCR.space engine implementation
//!
//! Remote OCR over HTTP. One instance per provider engine id; all instances
//! share the same `reqwest::Client` so connection pooling, the per-call
//! timeout and the redirect limit are configured in one place.

use crate::config::OcrSettings;
use crate::engine::{OcrEngine, RawOcrResult};
use crate::error::OcrError;
use futures::future::BoxFuture;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;

/// Longest slice of an error body echoed back into an error message
const MAX_ERROR_BODY: usize = 200;

/// Build the HTTP client shared by every engine
pub fn build_client(settings: &OcrSettings) -> Result<reqwest::Client, OcrError> {
    reqwest::Client::builder()
        .timeout(settings.timeout)
        .redirect(reqwest::redirect::Policy::limited(settings.max_redirects))
        .user_agent(concat!("fantasy-xi-ocr-server/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| OcrError::InitializationError(format!("Failed to build HTTP client: {}", e)))
}

/// One OCR.space recognition engine
pub struct OcrSpaceEngine {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    id: u8,
}

impl OcrSpaceEngine {
    pub fn new(client: reqwest::Client, settings: &OcrSettings, id: u8) -> Self {
        Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: settings.credentials().ok().map(str::to_string),
            id,
        }
    }

    fn form(&self, image: &[u8], api_key: &str) -> Result<Form, OcrError> {
        let file = Part::bytes(image.to_vec())
            .file_name("upload.jpg")
            .mime_str("image/jpeg")
            .map_err(|e| OcrError::InvalidRequest(format!("Invalid upload part: {}", e)))?;

        Ok(Form::new()
            .part("file", file)
            .text("apikey", api_key.to_string())
            .text("language", "eng")
            .text("OCREngine", self.id.to_string())
            .text("detectOrientation", "true")
            .text("isTable", "false")
            .text("scale", "true")
            .text("filetype", "jpg"))
    }

    async fn submit(&self, image: &[u8]) -> Result<RawOcrResult, OcrError> {
        let api_key = self.api_key.as_deref().ok_or(OcrError::NotConfigured)?;
        let form = self.form(image, api_key)?;

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_transport_error)?;

        if !status.is_success() {
            return Err(OcrError::ProviderError(format!(
                "HTTP {}: {}",
                status,
                truncate(body.trim(), MAX_ERROR_BODY)
            )));
        }

        parse_response(&body, self.id)
    }
}

impl OcrEngine for OcrSpaceEngine {
    fn id(&self) -> u8 {
        self.id
    }

    fn description(&self) -> &'static str {
        match self.id {
            1 => "OCR.space engine 1 (fast, broad language support)",
            2 => "OCR.space engine 2 (better on stylised UI text and numbers)",
            3 => "OCR.space engine 3 (highest accuracy, slowest)",
            _ => "OCR.space engine",
        }
    }

    fn recognize<'a>(&'a self, image: &'a [u8]) -> BoxFuture<'a, Result<RawOcrResult, OcrError>> {
        Box::pin(self.submit(image))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParseResponse {
    #[serde(default)]
    parsed_results: Option<Vec<ParsedResult>>,
    #[serde(default)]
    is_errored_on_processing: bool,
    #[serde(default)]
    error_message: Option<Value>,
    #[serde(default)]
    error_details: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParsedResult {
    #[serde(default)]
    parsed_text: Option<String>,
    #[serde(default)]
    error_message: Option<Value>,
}

/// Turn a provider response body into a result for `engine_id`.
///
/// An empty `ParsedText` is a successful call with no text; deciding whether
/// that is fatal belongs to the orchestrator.
fn parse_response(body: &str, engine_id: u8) -> Result<RawOcrResult, OcrError> {
    let parsed: ParseResponse = serde_json::from_str(body)
        .map_err(|e| OcrError::ProviderError(format!("Malformed provider response: {}", e)))?;

    if parsed.is_errored_on_processing {
        let message = parsed
            .error_message
            .as_ref()
            .or(parsed.error_details.as_ref())
            .and_then(message_text)
            .unwrap_or_else(|| "processing failed".to_string());
        return Err(OcrError::ProviderError(message));
    }

    let first = parsed
        .parsed_results
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| OcrError::ProviderError("Response contained no parsed results".to_string()))?;

    match first.parsed_text {
        Some(text) => Ok(RawOcrResult::new(text, engine_id)),
        None => Err(OcrError::ProviderError(
            first
                .error_message
                .as_ref()
                .and_then(message_text)
                .unwrap_or_else(|| "Parsed result had no text field".to_string()),
        )),
    }
}

/// The provider sends error messages either as a string or a list of strings
fn message_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

fn classify_transport_error(e: reqwest::Error) -> OcrError {
    if e.is_timeout() || e.is_connect() || e.is_request() {
        OcrError::NetworkUnavailable(e.to_string())
    } else {
        OcrError::ProviderError(e.to_string())
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
