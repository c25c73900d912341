use crate::error::OcrError;
use crate::Args;
use std::time::Duration;

/// Keys shipped in sample env files that must never reach the provider.
const PLACEHOLDER_KEYS: &[&str] = &["changeme", "placeholder", "none", "null", "test"];

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_file_size: usize,
    pub ocr: OcrSettings,
}

/// Settings for talking to the OCR provider
#[derive(Debug, Clone)]
pub struct OcrSettings {
    pub api_key: Option<String>,
    pub endpoint: String,
    /// Provider engine ids in priority order
    pub engines: Vec<u8>,
    pub early_exit_chars: usize,
    pub timeout: Duration,
    pub max_redirects: usize,
}

impl OcrSettings {
    /// Returns the API key, or `NotConfigured` when it is missing or a placeholder.
    pub fn credentials(&self) -> Result<&str, OcrError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !is_placeholder(key) => Ok(key),
            _ => Err(OcrError::NotConfigured),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials().is_ok()
    }
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://api.ocr.space/parse/image".to_string(),
            engines: vec![2, 1],
            early_exit_chars: 100,
            timeout: Duration::from_secs(20),
            max_redirects: 3,
        }
    }
}

fn is_placeholder(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    lower.is_empty()
        || lower.starts_with("your_")
        || lower.starts_with("your-")
        || lower.chars().all(|c| c == 'x' || c == '*')
        || PLACEHOLDER_KEYS.contains(&lower.as_str())
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            max_file_size: args.max_file_size,
            ocr: OcrSettings {
                api_key: args.ocr_api_key,
                endpoint: args.ocr_endpoint,
                engines: args.ocr_engines,
                early_exit_chars: args.early_exit_chars,
                timeout: Duration::from_secs(args.ocr_timeout_secs),
                max_redirects: args.max_redirects,
            },
        }
    }
}
