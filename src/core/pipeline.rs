use crate::core::decoder::{self, DataUrlMode};
use crate::core::{DeliveryStop, ImagePayload, OcrBackend, Pipeline, RawText, StopExtractor};
use crate::utils::error::{ManifestError, Result};
use std::sync::Arc;

/// decode → OCR → extract over a configured backend and heuristic
pub struct OcrPipeline {
    backend: Arc<dyn OcrBackend>,
    extractor: Box<dyn StopExtractor>,
    data_url_mode: DataUrlMode,
}

impl OcrPipeline {
    pub fn new(
        backend: Arc<dyn OcrBackend>,
        extractor: Box<dyn StopExtractor>,
        data_url_mode: DataUrlMode,
    ) -> Self {
        Self {
            backend,
            extractor,
            data_url_mode,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn extraction_mode(&self) -> &'static str {
        self.extractor.mode_name()
    }
}

#[async_trait::async_trait]
impl Pipeline for OcrPipeline {
    async fn decode(&self, data_url: &str) -> Result<ImagePayload> {
        let payload = decoder::decode_data_url(data_url, self.data_url_mode)?;
        tracing::debug!(
            "Decoded {} image bytes (media type: {})",
            payload.len(),
            payload.media_type.as_deref().unwrap_or("unknown")
        );
        Ok(payload)
    }

    async fn recognize(&self, image: ImagePayload) -> Result<RawText> {
        tracing::debug!("Running OCR with backend: {}", self.backend.name());
        let text = self.backend.recognize(&image).await?;
        tracing::debug!("OCR returned {} characters", text.char_count());
        Ok(text)
    }

    async fn extract(&self, text: RawText) -> Result<Vec<DeliveryStop>> {
        if text.is_blank() {
            return Err(ManifestError::NoStopsFound);
        }
        self.extractor.extract(&text)
    }
}
