pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::http::{router, AppState};
pub use config::ServiceConfig;
pub use crate::core::{engine::ManifestEngine, pipeline::OcrPipeline};
pub use domain::model::{DeliveryStop, RawText, StopList};
pub use utils::error::{ManifestError, Result};
