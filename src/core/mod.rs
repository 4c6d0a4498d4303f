pub mod decoder;
pub mod engine;
pub mod extractor;
pub mod pipeline;

pub use crate::domain::model::{DeliveryStop, ImagePayload, RawText, StopList};
pub use crate::domain::ports::{OcrBackend, Pipeline, StopExtractor};
pub use crate::utils::error::Result;
