pub mod tesseract;
pub mod vision;

pub use tesseract::{TesseractBackend, TesseractConfig};
pub use vision::{VisionBackend, VisionConfig};

use crate::config::{OcrBackendKind, OcrConfig};
use crate::core::OcrBackend;
use crate::utils::error::Result;
use std::sync::Arc;

/// Build the one OCR backend this process serves with
pub fn build_backend(config: &OcrConfig) -> Result<Arc<dyn OcrBackend>> {
    let backend: Arc<dyn OcrBackend> = match config.backend {
        OcrBackendKind::Tesseract => Arc::new(TesseractBackend::new(config.tesseract.clone())),
        OcrBackendKind::Vision => Arc::new(VisionBackend::new(config.vision_config()?)),
    };
    tracing::info!("🔍 OCR backend: {}", backend.name());
    Ok(backend)
}
