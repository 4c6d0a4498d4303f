use crate::core::decoder::normalize_image;
use crate::core::{ImagePayload, OcrBackend, RawText};
use crate::utils::error::{ManifestError, Result};
use image::ImageFormat;
use std::io::Cursor;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

pub const DEFAULT_TESSERACT_BINARY: &str = "tesseract";
pub const DEFAULT_LANGUAGES: &str = "eng+nor";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TesseractConfig {
    pub binary: String,
    pub languages: String,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_TESSERACT_BINARY.to_string(),
            languages: DEFAULT_LANGUAGES.to_string(),
        }
    }
}

/// Local OCR through the installed `tesseract` executable. The image is piped
/// through stdin as PNG and the text is read from stdout.
pub struct TesseractBackend {
    config: TesseractConfig,
}

impl TesseractBackend {
    pub fn new(config: TesseractConfig) -> Self {
        Self { config }
    }

    fn args(&self) -> [&str; 4] {
        ["stdin", "stdout", "-l", self.config.languages.as_str()]
    }

    /// 子行程的 I/O 錯誤都算 OCR 後端失敗
    fn process_failure(&self, action: &str, err: std::io::Error) -> ManifestError {
        ManifestError::upstream(format!("failed to {} {}: {}", action, self.config.binary, err))
    }
}

fn encode_png(bytes: &[u8]) -> Result<Vec<u8>> {
    let image = normalize_image(bytes)?;
    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| ManifestError::invalid_input(e.to_string()))?;
    Ok(png)
}

#[async_trait::async_trait]
impl OcrBackend for TesseractBackend {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    async fn recognize(&self, image: &ImagePayload) -> Result<RawText> {
        let bytes = image.bytes.clone();
        let png = tokio::task::spawn_blocking(move || encode_png(&bytes))
            .await
            .map_err(|e| ManifestError::upstream(format!("image encoding task failed: {}", e)))??;

        tracing::debug!(
            "Running {} {:?} on {} byte PNG",
            self.config.binary,
            self.args(),
            png.len()
        );

        let mut child = Command::new(&self.config.binary)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.process_failure("start", e))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ManifestError::upstream("tesseract stdin is not available"))?;

        // 寫入與讀取同時進行，避免大圖時管道塞滿
        let writer = tokio::spawn(async move {
            stdin.write_all(&png).await?;
            stdin.shutdown().await
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| self.process_failure("read output of", e))?;

        if let Ok(Err(e)) = writer.await {
            tracing::debug!("tesseract closed stdin early: {}", e);
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ManifestError::upstream(format!(
                "{} exited with {}: {}",
                self.config.binary,
                output.status,
                stderr.trim()
            )));
        }

        Ok(RawText::new(
            String::from_utf8_lossy(&output.stdout).into_owned(),
        ))
    }
}
