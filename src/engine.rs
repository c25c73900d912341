use crate::error::OcrError;
use futures::future::BoxFuture;

/// Text recognized by one engine call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOcrResult {
    pub text: String,
    pub engine_id: u8,
    /// Number of non-empty recognized lines, used as a confidence signal
    pub line_count: usize,
}

impl RawOcrResult {
    pub fn new(text: String, engine_id: u8) -> Self {
        let line_count = text.lines().filter(|l| !l.trim().is_empty()).count();
        Self {
            text,
            engine_id,
            line_count,
        }
    }

    /// Character count of the trimmed text
    pub fn text_len(&self) -> usize {
        self.text.trim().chars().count()
    }
}

/// Trait that all OCR engines must implement
pub trait OcrEngine: Send + Sync {
    /// Provider-side engine identifier
    fn id(&self) -> u8;

    /// Returns a human-readable description of the engine
    fn description(&self) -> &'static str;

    /// Submit an image and return the recognized text.
    ///
    /// Implementations report transport failures as `NetworkUnavailable` and
    /// anything the provider answered with as `ProviderError`.
    fn recognize<'a>(&'a self, image: &'a [u8]) -> BoxFuture<'a, Result<RawOcrResult, OcrError>>;
}
