use crate::config::{OcrBackendKind, ServiceConfig};
use crate::core::decoder::DataUrlMode;
use crate::core::extractor::{ConsumptionPolicy, ExtractionMode};
use crate::utils::error::{ManifestError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

/// Optional TOML settings file. Every key may be omitted.
///
/// ```toml
/// [server]
/// port = 5001
///
/// [ocr]
/// backend = "vision"
/// api_key = "${GOOGLE_API_KEY}"
///
/// [extraction]
/// mode = "lookahead"
///
/// [cors]
/// frontend_origin = "https://routes.example.com"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub ocr: OcrSection,
    #[serde(default)]
    pub extraction: ExtractionSection,
    #[serde(default)]
    pub cors: CorsSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrSection {
    pub backend: Option<OcrBackendKind>,
    pub api_key: Option<String>,
    pub vision_endpoint: Option<String>,
    pub tesseract_path: Option<String>,
    pub languages: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionSection {
    pub mode: Option<ExtractionMode>,
    pub consumption: Option<ConsumptionPolicy>,
    pub data_url: Option<DataUrlMode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorsSection {
    pub allowed_origins: Option<Vec<String>>,
    pub frontend_origin: Option<String>,
}

impl SettingsFile {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| ManifestError::ConfigError {
            message: format!(
                "cannot read settings file {}: {}",
                path.as_ref().display(),
                e
            ),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ManifestError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GOOGLE_API_KEY})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// Overlay every key present in the file onto `config`.
    pub fn apply_to(&self, config: &mut ServiceConfig) -> Result<()> {
        if let Some(host) = &self.server.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.server.port {
            config.server.port = port;
        }

        if let Some(backend) = self.ocr.backend {
            config.ocr.backend = backend;
        }
        // 未解析的 ${VAR} 視為沒有設定
        if let Some(api_key) = self.ocr.api_key.as_deref().filter(|k| !is_placeholder(k)) {
            config.ocr.api_key = Some(api_key.to_string());
        }
        if let Some(endpoint) = &self.ocr.vision_endpoint {
            config.ocr.vision_endpoint = endpoint.clone();
        }
        if let Some(path) = &self.ocr.tesseract_path {
            config.ocr.tesseract.binary = path.clone();
        }
        if let Some(languages) = &self.ocr.languages {
            config.ocr.tesseract.languages = languages.clone();
        }

        if let Some(mode) = self.extraction.mode {
            config.extraction.mode = mode;
        }
        if let Some(consumption) = self.extraction.consumption {
            config.extraction.consumption = consumption;
        }
        if let Some(data_url) = self.extraction.data_url {
            config.extraction.data_url = data_url;
        }

        if let Some(origins) = &self.cors.allowed_origins {
            config.cors.allowed_origins = origins.clone();
        }
        if let Some(origin) = &self.cors.frontend_origin {
            if is_placeholder(origin) {
                return Err(ManifestError::InvalidConfigValueError {
                    field: "cors.frontend_origin".to_string(),
                    value: origin.clone(),
                    reason: "environment variable is not set".to_string(),
                });
            }
            config.cors.add_origin(origin);
        }

        Ok(())
    }
}

fn is_placeholder(value: &str) -> bool {
    ENV_PLACEHOLDER.is_match(value.trim())
}
