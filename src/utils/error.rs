use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Invalid image data: {message}")]
    InvalidInput { message: String },

    #[error("OCR backend failed: {message}")]
    UpstreamFailure { message: String },

    #[error("No text found in image.")]
    NoTextFound,

    #[error("No delivery stops found in image.")]
    NoStopsFound,

    #[error("Invalid request body: {message}")]
    InvalidRequest { status: u16, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, ManifestError>;

impl ManifestError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamFailure {
            message: message.into(),
        }
    }

    /// 穩定的錯誤種類字串，用於 HTTP 回應的 `error` 欄位
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::UpstreamFailure { .. } => "upstream_failure",
            Self::NoTextFound => "no_text_found",
            Self::NoStopsFound => "no_stops_found",
            Self::IoError(_) => "internal_error",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "config_error",
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput { .. } => 400,
            Self::InvalidRequest { status, .. } => *status,
            Self::NoTextFound | Self::NoStopsFound => 404,
            _ => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(ManifestError::invalid_input("bad").status_code(), 400);
        assert_eq!(ManifestError::NoStopsFound.status_code(), 404);
        assert_eq!(ManifestError::NoTextFound.status_code(), 404);
        assert_eq!(ManifestError::upstream("boom").status_code(), 500);
        assert_eq!(
            ManifestError::ConfigError {
                message: "x".to_string()
            }
            .status_code(),
            500
        );
    }

    #[test]
    fn test_request_body_errors_keep_their_status() {
        let err = ManifestError::InvalidRequest {
            status: 413,
            message: "length limit exceeded".to_string(),
        };
        assert_eq!(err.status_code(), 413);
        assert_eq!(err.kind(), "invalid_request");
        assert!(err.to_string().starts_with("Invalid request body"));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_messages_echo_cause() {
        let err = ManifestError::invalid_input("Invalid byte 33, offset 0.");
        assert_eq!(
            err.to_string(),
            "Invalid image data: Invalid byte 33, offset 0."
        );
        assert!(err.is_client_error());
        assert_eq!(err.kind(), "invalid_input");

        let err = ManifestError::upstream("status 503");
        assert!(err.to_string().contains("status 503"));
        assert!(!err.is_client_error());
    }
}
