use crate::core::{ImagePayload, OcrBackend, RawText};
use crate::utils::error::{ManifestError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisionConfig {
    pub api_key: String,
    pub endpoint: String,
}

impl VisionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_VISION_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct AnnotateRequest<'a> {
    requests: [AnnotateImageRequest<'a>; 1],
}

#[derive(Debug, Serialize)]
struct AnnotateImageRequest<'a> {
    image: VisionImage<'a>,
    features: [Feature; 1],
}

#[derive(Debug, Serialize)]
struct VisionImage<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
struct AnnotateImageResponse {
    #[serde(default, rename = "textAnnotations")]
    text_annotations: Vec<TextAnnotation>,
    #[serde(default)]
    error: Option<VisionStatus>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct VisionStatus {
    #[serde(default)]
    message: String,
}

/// Google Cloud Vision `images:annotate` with `TEXT_DETECTION`.
///
/// The first text annotation holds the full detected text; the rest are
/// per-word boxes and are ignored.
pub struct VisionBackend {
    client: Client,
    config: VisionConfig,
}

impl VisionBackend {
    pub fn new(config: VisionConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: VisionConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait::async_trait]
impl OcrBackend for VisionBackend {
    fn name(&self) -> &'static str {
        "vision"
    }

    async fn recognize(&self, image: &ImagePayload) -> Result<RawText> {
        let content = STANDARD.encode(&image.bytes);
        let body = AnnotateRequest {
            requests: [AnnotateImageRequest {
                image: VisionImage { content: &content },
                features: [Feature {
                    kind: "TEXT_DETECTION",
                }],
            }],
        };

        tracing::debug!("Making Vision API request to: {}", self.config.endpoint);
        let response = self
            .client
            .post(&self.config.endpoint)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            // URL 內含 API key，不可出現在錯誤訊息中
            .map_err(|e| ManifestError::upstream(e.without_url().to_string()))?;

        let status = response.status();
        tracing::debug!("Vision API response status: {}", status);

        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ManifestError::upstream(format!(
                "Vision API returned {}: {}",
                status,
                detail.trim()
            )));
        }

        let parsed: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| ManifestError::upstream(e.without_url().to_string()))?;

        let first = parsed.responses.into_iter().next();
        if let Some(message) = first
            .as_ref()
            .and_then(|r| r.error.as_ref())
            .map(|status| status.message.clone())
        {
            return Err(ManifestError::upstream(format!("Vision API error: {}", message)));
        }

        first
            .and_then(|r| r.text_annotations.into_iter().next())
            .map(|annotation| RawText::new(annotation.description))
            .ok_or(ManifestError::NoTextFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn backend(server: &MockServer) -> VisionBackend {
        VisionBackend::new(VisionConfig {
            api_key: "test-key".to_string(),
            endpoint: server.url("/v1/images:annotate"),
        })
    }

    fn image() -> ImagePayload {
        ImagePayload::new(b"\x89PNG fake".to_vec(), Some("image/png".to_string()))
    }

    #[tokio::test]
    async fn test_returns_first_annotation_description() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/images:annotate")
                .query_param("key", "test-key")
                .json_body(serde_json::json!({
                    "requests": [{
                        "image": {"content": STANDARD.encode(b"\x89PNG fake")},
                        "features": [{"type": "TEXT_DETECTION"}]
                    }]
                }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "responses": [{
                        "textAnnotations": [
                            {"description": "59 RANHEIMSVEIEN 211\n60 Bakke Bru 2"},
                            {"description": "59"}
                        ]
                    }]
                }));
        });

        let text = backend(&server).recognize(&image()).await.unwrap();

        api_mock.assert();
        assert_eq!(text.as_str(), "59 RANHEIMSVEIEN 211\n60 Bakke Bru 2");
    }

    #[tokio::test]
    async fn test_no_annotations_is_no_text_found() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/v1/images:annotate");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"responses": [{}]}));
        });

        let err = backend(&server).recognize(&image()).await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, ManifestError::NoTextFound));
    }

    #[tokio::test]
    async fn test_http_error_is_upstream_failure() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/v1/images:annotate");
            then.status(500).body("backend unavailable");
        });

        let err = backend(&server).recognize(&image()).await.unwrap_err();

        api_mock.assert();
        match err {
            ManifestError::UpstreamFailure { message } => {
                assert!(message.contains("500"));
                assert!(message.contains("backend unavailable"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_per_image_error_is_upstream_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/images:annotate");
            then.status(200).json_body(serde_json::json!({
                "responses": [{"error": {"code": 3, "message": "Bad image data."}}]
            }));
        });

        let err = backend(&server).recognize(&image()).await.unwrap_err();
        assert!(err.to_string().contains("Bad image data."));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_hides_api_key() {
        let backend = VisionBackend::new(VisionConfig {
            api_key: "super-secret".to_string(),
            endpoint: "http://127.0.0.1:1/v1/images:annotate".to_string(),
        });

        let err = backend.recognize(&image()).await.unwrap_err();
        assert!(matches!(err, ManifestError::UpstreamFailure { .. }));
        assert!(!err.to_string().contains("super-secret"));
    }
}
