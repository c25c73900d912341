//! OCR engine implementations
//!
//! The provider exposes several recognition engines behind one endpoint. Each
//! configured engine id becomes one `OcrEngine`, tried in configuration order.

pub mod ocr_space;

use crate::config::OcrSettings;
use crate::engine::OcrEngine;
use crate::error::OcrError;
use serde::Serialize;
use std::sync::Arc;

/// Information about a configured engine
#[derive(Debug, Clone, Serialize)]
pub struct EngineInfo {
    pub id: u8,
    pub description: &'static str,
}

/// Registry of configured OCR engines, in priority order
pub struct EngineRegistry {
    engines: Vec<Arc<dyn OcrEngine>>,
}

impl EngineRegistry {
    /// Build one engine per configured id sharing a single HTTP client
    pub fn new(settings: &OcrSettings) -> Result<Self, OcrError> {
        if settings.engines.is_empty() {
            return Err(OcrError::InitializationError(
                "No OCR engines configured. Pass --ocr-engines, e.g. 2,1".to_string(),
            ));
        }

        let client = ocr_space::build_client(settings)?;
        let mut engines: Vec<Arc<dyn OcrEngine>> = Vec::with_capacity(settings.engines.len());

        for &id in &settings.engines {
            if engines.iter().any(|e| e.id() == id) {
                tracing::warn!("Engine {} listed twice, ignoring duplicate", id);
                continue;
            }
            tracing::info!("Registering OCR.space engine {}", id);
            engines.push(Arc::new(ocr_space::OcrSpaceEngine::new(
                client.clone(),
                settings,
                id,
            )));
        }

        Ok(Self { engines })
    }

    #[cfg(test)]
    pub fn from_engines(engines: Vec<Arc<dyn OcrEngine>>) -> Self {
        Self { engines }
    }

    /// Engines in the order they should be tried
    pub fn engines(&self) -> &[Arc<dyn OcrEngine>] {
        &self.engines
    }

    /// Get info about all configured engines
    pub fn info(&self) -> Vec<EngineInfo> {
        self.engines
            .iter()
            .map(|e| EngineInfo {
                id: e.id(),
                description: e.description(),
            })
            .collect()
    }
}
