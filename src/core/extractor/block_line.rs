use crate::domain::model::{DeliveryStop, RawText};
use crate::core::extractor::split_lines;
use crate::domain::ports::StopExtractor;
use crate::utils::error::{ManifestError, Result};
use regex::Regex;
use std::sync::LazyLock;

static BLOCK_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("block separator pattern is valid"));

// e.g. "59 RANHEIMSVEIEN 211"，編號只接受 ASCII 數字
static ADDRESS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<number>[0-9]{1,3})\s+(?P<address>[\w.\-ÆØÅæøå\s\d]+)$")
        .expect("address line pattern is valid")
});

const CURLY_QUOTES: [char; 2] = ['\u{201C}', '\u{201D}'];

/// Line-per-stop manifests: every line shaped like `<1-3 digits> <address>`
/// becomes a stop. Output is sorted ascending by delivery number; equal numbers
/// keep their text order.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockLineExtractor;

impl BlockLineExtractor {
    pub fn new() -> Self {
        Self
    }

    fn parse_line(line: &str) -> Option<DeliveryStop> {
        let cleaned: String = line.trim().chars().filter(|c| !CURLY_QUOTES.contains(c)).collect();
        let caps = ADDRESS_LINE.captures(&cleaned)?;

        let delivery_number: u32 = caps["number"].parse().ok()?;
        if delivery_number == 0 {
            return None;
        }

        let address = caps["address"].trim();
        if address.is_empty() {
            return None;
        }

        Some(DeliveryStop::new(delivery_number, address))
    }
}

impl StopExtractor for BlockLineExtractor {
    fn mode_name(&self) -> &'static str {
        "block-line"
    }

    fn extract(&self, text: &RawText) -> Result<Vec<DeliveryStop>> {
        let mut stops: Vec<DeliveryStop> = BLOCK_SEPARATOR
            .split(text.as_str())
            .filter(|block| !block.trim().is_empty())
            .flat_map(split_lines)
            .filter_map(Self::parse_line)
            .collect();

        if stops.is_empty() {
            return Err(ManifestError::NoStopsFound);
        }

        stops.sort_by_key(|stop| stop.delivery_number);
        tracing::debug!("Block-line extractor captured {} stops", stops.len());
        Ok(stops)
    }
}
