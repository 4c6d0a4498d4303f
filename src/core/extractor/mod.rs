pub mod block_line;
pub mod lookahead;

pub use block_line::BlockLineExtractor;
pub use lookahead::{ConsumptionPolicy, LookaheadExtractor};

use crate::domain::ports::StopExtractor;
use crate::utils::error::ManifestError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

// OCR 輸出可能只用 \r 或其他 Unicode 換行字元分行
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\r\n|[\n\r\x0B\x0C\x1C-\x1E\x{85}\x{2028}\x{2029}]")
        .expect("line break pattern is valid")
});

/// Split OCR text into lines on every line boundary, not only `\n` / `\r\n`.
pub(crate) fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    LINE_BREAK.split(text)
}

/// Which line heuristic turns OCR text into stops. The two are never combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionMode {
    /// `<number> <address>` on one line, sorted by number
    #[default]
    BlockLine,
    /// number / address / [name] / postal line, text order
    Lookahead,
}

impl ExtractionMode {
    pub fn build(self, policy: ConsumptionPolicy) -> Box<dyn StopExtractor> {
        match self {
            Self::BlockLine => Box::new(BlockLineExtractor::new()),
            Self::Lookahead => Box::new(LookaheadExtractor::new(policy)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BlockLine => "block-line",
            Self::Lookahead => "lookahead",
        }
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtractionMode {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block-line" | "block_line" | "a" => Ok(Self::BlockLine),
            "lookahead" | "b" => Ok(Self::Lookahead),
            other => Err(ManifestError::InvalidConfigValueError {
                field: "extraction".to_string(),
                value: other.to_string(),
                reason: "Valid modes: block-line, lookahead".to_string(),
            }),
        }
    }
}
