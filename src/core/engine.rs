use crate::core::{DeliveryStop, Pipeline};
use crate::utils::error::Result;
use std::time::Instant;

pub struct ManifestEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ManifestEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self, data_url: &str) -> Result<Vec<DeliveryStop>> {
        let started = Instant::now();

        // Decode
        let image = self.pipeline.decode(data_url).await?;

        // OCR
        let text = self.pipeline.recognize(image).await?;

        // Extract
        let stops = self.pipeline.extract(text).await?;

        tracing::info!(
            "✅ Extracted {} delivery stops in {:?}",
            stops.len(),
            started.elapsed()
        );
        Ok(stops)
    }
}
