use crate::config::{OcrBackendKind, ServiceConfig, SettingsFile};
use crate::core::decoder::DataUrlMode;
use crate::core::extractor::{ConsumptionPolicy, ExtractionMode};
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "manifest-ocr")]
#[command(about = "Reads delivery stops from photos of delivery manifests")]
pub struct CliConfig {
    #[arg(long, help = "TOML settings file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    #[arg(long, env = "OCR_BACKEND", help = "tesseract or vision")]
    pub backend: Option<OcrBackendKind>,

    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "VISION_ENDPOINT")]
    pub vision_endpoint: Option<String>,

    #[arg(long, env = "TESSERACT_PATH")]
    pub tesseract_path: Option<String>,

    #[arg(long, help = "Tesseract language hint, e.g. eng+nor")]
    pub languages: Option<String>,

    #[arg(long, env = "EXTRACTION_MODE", help = "block-line or lookahead")]
    pub extraction: Option<ExtractionMode>,

    #[arg(long, help = "Treat input without a ',' as a bare base64 payload")]
    pub lenient_data_url: bool,

    #[arg(long, help = "Lookahead mode: never re-read lines claimed by a stop")]
    pub skip_claimed_lines: bool,

    #[arg(long, env = "ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    #[arg(long, env = "FRONTEND_ORIGIN")]
    pub frontend_origin: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// defaults → settings file → flags/environment
    pub fn into_service_config(self) -> Result<ServiceConfig> {
        let mut config = ServiceConfig::default();

        if let Some(path) = &self.config {
            tracing::debug!("Loading settings file: {}", path.display());
            SettingsFile::from_file(path)?.apply_to(&mut config)?;
        }

        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(backend) = self.backend {
            config.ocr.backend = backend;
        }
        if let Some(api_key) = self.api_key.filter(|k| !k.trim().is_empty()) {
            config.ocr.api_key = Some(api_key);
        }
        if let Some(endpoint) = self.vision_endpoint {
            config.ocr.vision_endpoint = endpoint;
        }
        if let Some(path) = self.tesseract_path {
            config.ocr.tesseract.binary = path;
        }
        if let Some(languages) = self.languages {
            config.ocr.tesseract.languages = languages;
        }
        if let Some(mode) = self.extraction {
            config.extraction.mode = mode;
        }
        if self.lenient_data_url {
            config.extraction.data_url = DataUrlMode::Lenient;
        }
        if self.skip_claimed_lines {
            config.extraction.consumption = ConsumptionPolicy::SkipClaimed;
        }

        let origins: Vec<String> = self
            .allowed_origins
            .iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if !origins.is_empty() {
            config.cors.allowed_origins = origins;
        }
        if let Some(origin) = &self.frontend_origin {
            config.cors.add_origin(origin);
        }

        Ok(config)
    }
}
