#[cfg(feature = "cli")]
pub mod cli;
pub mod settings;

use crate::adapters::ocr::vision::DEFAULT_VISION_ENDPOINT;
use crate::adapters::ocr::{TesseractConfig, VisionConfig};
use crate::core::decoder::DataUrlMode;
use crate::core::extractor::{ConsumptionPolicy, ExtractionMode};
use crate::utils::error::{ManifestError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use settings::SettingsFile;

/// Local development frontends
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://localhost:5174",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrBackendKind {
    #[default]
    Tesseract,
    Vision,
}

impl fmt::Display for OcrBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tesseract => f.write_str("tesseract"),
            Self::Vision => f.write_str("vision"),
        }
    }
}

impl FromStr for OcrBackendKind {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tesseract" | "local" => Ok(Self::Tesseract),
            "vision" | "google" | "remote" => Ok(Self::Vision),
            other => Err(ManifestError::InvalidConfigValueError {
                field: "backend".to_string(),
                value: other.to_string(),
                reason: "Valid backends: tesseract, vision".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrConfig {
    pub backend: OcrBackendKind,
    pub api_key: Option<String>,
    pub vision_endpoint: String,
    pub tesseract: TesseractConfig,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            backend: OcrBackendKind::default(),
            api_key: None,
            vision_endpoint: DEFAULT_VISION_ENDPOINT.to_string(),
            tesseract: TesseractConfig::default(),
        }
    }
}

impl OcrConfig {
    /// Vision 後端的設定，API key 必須存在
    pub fn vision_config(&self) -> Result<VisionConfig> {
        let api_key = validation::validate_required_field("ocr.api_key", &self.api_key)?;
        validation::validate_non_empty_string("ocr.api_key", api_key)?;
        Ok(VisionConfig {
            api_key: api_key.clone(),
            endpoint: self.vision_endpoint.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractionConfig {
    pub mode: ExtractionMode,
    pub consumption: ConsumptionPolicy,
    pub data_url: DataUrlMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CorsConfig {
    pub fn add_origin(&mut self, origin: &str) {
        let origin = origin.trim().trim_end_matches('/');
        if !origin.is_empty() && !self.allowed_origins.iter().any(|o| o == origin) {
            self.allowed_origins.push(origin.to_string());
        }
    }

    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Everything the service needs, merged from defaults, the settings file and
/// command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
    pub extraction: ExtractionConfig,
    pub cors: CorsConfig,
}

impl ServiceConfig {
    pub fn from_settings(file: &SettingsFile) -> Result<Self> {
        let mut config = Self::default();
        file.apply_to(&mut config)?;
        Ok(config)
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.server.host)?;
        validation::validate_positive_number("server.port", self.server.port as usize, 1)?;

        match self.ocr.backend {
            OcrBackendKind::Vision => {
                self.ocr.vision_config()?;
                validation::validate_url("ocr.vision_endpoint", &self.ocr.vision_endpoint)?;
            }
            OcrBackendKind::Tesseract => {
                validation::validate_non_empty_string(
                    "ocr.tesseract_path",
                    &self.ocr.tesseract.binary,
                )?;
                validation::validate_non_empty_string(
                    "ocr.languages",
                    &self.ocr.tesseract.languages,
                )?;
            }
        }

        if self.cors.allowed_origins.is_empty() {
            return Err(ManifestError::ConfigError {
                message: "cors.allowed_origins must list at least one origin".to_string(),
            });
        }
        for origin in &self.cors.allowed_origins {
            validation::validate_origin("cors.allowed_origins", origin)?;
        }

        tracing::info!("✅ Service configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind_address(), "0.0.0.0:5001");
        assert_eq!(config.ocr.tesseract.languages, "eng+nor");
        assert_eq!(config.extraction.mode, ExtractionMode::BlockLine);
    }

    #[test]
    fn test_vision_without_api_key_fails_validation() {
        let mut config = ServiceConfig::default();
        config.ocr.backend = OcrBackendKind::Vision;
        assert!(matches!(
            config.validate(),
            Err(ManifestError::MissingConfigError { .. })
        ));

        config.ocr.api_key = Some("   ".to_string());
        assert!(config.validate().is_err());

        config.ocr.api_key = Some("AIza-test".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_add_origin_deduplicates() {
        let mut cors = CorsConfig::default();
        cors.add_origin("https://routes.example.com/");
        cors.add_origin("https://routes.example.com");
        cors.add_origin("http://localhost:3000");

        assert_eq!(cors.allowed_origins.len(), 4);
        assert!(!cors.allows_any());
    }

    #[test]
    fn test_backend_kind_parsing() {
        assert_eq!("Vision".parse::<OcrBackendKind>().unwrap(), OcrBackendKind::Vision);
        assert_eq!("local".parse::<OcrBackendKind>().unwrap(), OcrBackendKind::Tesseract);
        assert!("paddle".parse::<OcrBackendKind>().is_err());
    }
}
