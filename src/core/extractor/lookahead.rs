use crate::domain::model::{DeliveryStop, RawText};
use crate::core::extractor::split_lines;
use crate::domain::ports::StopExtractor;
use crate::utils::error::{ManifestError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static NUMBER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[0-9]{1,3}\s*$").expect("number line pattern is valid"));

static POSTAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}").expect("postal code pattern is valid"));

/// Where the scan resumes after a record has been emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsumptionPolicy {
    /// Advance one line. Lines claimed by a record are inspected again as
    /// possible record starts, so a digit-only address line can start a
    /// second record.
    #[default]
    Rescan,
    /// Resume after the last line claimed by the emitted record.
    SkipClaimed,
}

/// Multi-line manifests:
///
/// ```text
/// 58
/// Storgata 6
/// Ola Nordmann      <- optional name
/// 0155 Oslo         <- first line with a 4-digit run
/// ```
///
/// Output keeps text order.
#[derive(Debug, Clone, Copy, Default)]
pub struct LookaheadExtractor {
    policy: ConsumptionPolicy,
}

struct Record {
    stop: DeliveryStop,
    last_line: usize,
}

impl LookaheadExtractor {
    pub fn new(policy: ConsumptionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ConsumptionPolicy {
        self.policy
    }

    fn read_record(lines: &[&str], start: usize, delivery_number: u32) -> Option<Record> {
        let address = lines.get(start + 1)?;
        let third = lines.get(start + 2)?;

        let (name, postal_city, last_line) = if POSTAL_CODE.is_match(third) {
            (None, *third, start + 2)
        } else {
            let postal_city = lines.get(start + 3).filter(|l| POSTAL_CODE.is_match(l))?;
            (Some(*third), *postal_city, start + 3)
        };

        let mut stop = DeliveryStop::new(delivery_number, format!("{}, {}", address, postal_city));
        if let Some(name) = name {
            stop = stop.with_name(name);
        }

        Some(Record { stop, last_line })
    }
}

impl StopExtractor for LookaheadExtractor {
    fn mode_name(&self) -> &'static str {
        "lookahead"
    }

    fn extract(&self, text: &RawText) -> Result<Vec<DeliveryStop>> {
        let lines: Vec<&str> = split_lines(text.as_str())
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let mut stops = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            let number = NUMBER_LINE
                .is_match(lines[i])
                .then(|| lines[i].parse::<u32>().ok())
                .flatten()
                .filter(|n| *n > 0);

            if let Some(number) = number {
                if let Some(record) = Self::read_record(&lines, i, number) {
                    stops.push(record.stop);
                    if self.policy == ConsumptionPolicy::SkipClaimed {
                        i = record.last_line + 1;
                        continue;
                    }
                }
            }
            i += 1;
        }

        if stops.is_empty() {
            return Err(ManifestError::NoStopsFound);
        }

        tracing::debug!("Lookahead extractor captured {} stops", stops.len());
        Ok(stops)
    }
}
