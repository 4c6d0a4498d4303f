use crate::domain::model::{DeliveryStop, ImagePayload, RawText};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Given image bytes, return recognized text.
#[async_trait]
pub trait OcrBackend: Send + Sync {
    fn name(&self) -> &'static str;
    async fn recognize(&self, image: &ImagePayload) -> Result<RawText>;
}

/// Turns OCR text into delivery stops. Implementations hold no per-call state.
pub trait StopExtractor: Send + Sync {
    fn mode_name(&self) -> &'static str;
    fn extract(&self, text: &RawText) -> Result<Vec<DeliveryStop>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn decode(&self, data_url: &str) -> Result<ImagePayload>;
    async fn recognize(&self, image: ImagePayload) -> Result<RawText>;
    async fn extract(&self, text: RawText) -> Result<Vec<DeliveryStop>>;
}
