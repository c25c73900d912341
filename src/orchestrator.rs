//! Engine orchestration
//!
//! Submits one image to each configured engine in priority order and keeps the
//! best text. Engines are awaited sequentially; dropping the returned future
//! aborts the in-flight request and skips the remaining engines.

use crate::config::OcrSettings;
use crate::engine::RawOcrResult;
use crate::engines::EngineRegistry;
use crate::error::OcrError;
use std::time::Instant;

pub struct Orchestrator {
    registry: EngineRegistry,
    settings: OcrSettings,
}

impl Orchestrator {
    pub fn new(settings: OcrSettings) -> Result<Self, OcrError> {
        let registry = EngineRegistry::new(&settings)?;
        Ok(Self { registry, settings })
    }

    #[cfg(test)]
    pub fn with_registry(registry: EngineRegistry, settings: OcrSettings) -> Self {
        Self { registry, settings }
    }

    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &OcrSettings {
        &self.settings
    }

    /// Run the image through the engines and return the best non-empty text
    pub async fn recognize(&self, image: &[u8]) -> Result<RawOcrResult, OcrError> {
        self.settings.credentials()?;

        let mut best: Option<RawOcrResult> = None;
        let mut outcomes = Outcomes::default();

        for engine in self.registry.engines() {
            let start = Instant::now();
            match engine.recognize(image).await {
                Ok(result) => {
                    tracing::info!(
                        "Engine {} returned {} chars in {} lines ({}ms)",
                        engine.id(),
                        result.text_len(),
                        result.line_count,
                        start.elapsed().as_millis()
                    );
                    outcomes.responded += 1;
                    if result.text_len() > 0 && is_better(&result, best.as_ref()) {
                        best = Some(result);
                    }
                }
                Err(e) => {
                    tracing::warn!("Engine {} failed, trying next: {}", engine.id(), e);
                    outcomes.record_failure(e);
                }
            }

            if let Some(current) = &best {
                if current.text_len() > self.settings.early_exit_chars {
                    tracing::debug!(
                        "Engine {} passed the {}-char threshold, skipping remaining engines",
                        current.engine_id,
                        self.settings.early_exit_chars
                    );
                    break;
                }
            }
        }

        match best {
            Some(result) => Ok(result),
            None => Err(outcomes.into_error()),
        }
    }
}

/// More text wins, ties go to the result with more recognized lines
fn is_better(candidate: &RawOcrResult, current: Option<&RawOcrResult>) -> bool {
    match current {
        None => true,
        Some(current) => {
            (candidate.text_len(), candidate.line_count) > (current.text_len(), current.line_count)
        }
    }
}

/// What happened across all engine attempts, for the aggregate error.
///
/// Any successful (if empty) response means the image simply had no text;
/// otherwise a provider complaint beats a network failure.
#[derive(Default)]
struct Outcomes {
    responded: usize,
    network_failures: usize,
    last_network: Option<String>,
    last_provider: Option<String>,
}

impl Outcomes {
    fn record_failure(&mut self, error: OcrError) {
        match error {
            OcrError::NetworkUnavailable(message) => {
                self.network_failures += 1;
                self.last_network = Some(message);
            }
            OcrError::ProviderError(message) => self.last_provider = Some(message),
            other => self.last_provider = Some(other.to_string()),
        }
    }

    fn into_error(self) -> OcrError {
        if self.responded > 0 {
            OcrError::NoTextDetected
        } else if let Some(message) = self.last_provider {
            OcrError::ProviderError(message)
        } else if let Some(last) = self.last_network {
            OcrError::NetworkUnavailable(format!(
                "all {} engine attempts failed, last: {}",
                self.network_failures, last
            ))
        } else {
            OcrError::NoTextDetected
        }
    }
}
