use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::calendar::Granularity;
use crate::config::GroupingScheme;
use crate::export::SenderIdentity;

#[cfg(test)]
use anyhow::{anyhow, bail};
#[cfg(test)]
use jsonschema::{Draft, JSONSchema};

pub const SCHEMA_VERSION: i32 = 1;

/// Aggregated statistics of one chat export.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StatisticsResult {
    pub schema_version: i32,
    pub name: String,
    /// Last year of the by-year range: the current year at build time, or
    /// the last message year when the export runs past the clock.
    pub range_end_year: i32,
    pub grouping: GroupingScheme,
    pub coverage: Coverage,
    pub summary: Summary,
    pub years: Vec<YearSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peaks: Option<Peaks>,
    pub histograms: Vec<HistogramTable>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Coverage {
    pub first_message_date: NaiveDateTime,
    pub last_message_date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Summary {
    pub total_messages: usize,
    pub total_joins: usize,
    pub total_invites: usize,
    pub distinct_senders: usize,
    pub top_senders: Vec<SenderCount>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub messages: usize,
    pub joins: usize,
    pub invites: usize,
    pub top_senders: Vec<SenderCount>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SenderCount {
    pub sender: SenderIdentity,
    pub messages: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Peaks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<PeakYear>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<PeakMonth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekday: Option<PeakWeekday>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PeakYear {
    pub year: i32,
    pub messages: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PeakMonth {
    /// `YYYY-MM`
    pub month: String,
    pub messages: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PeakWeekday {
    pub weekday: String,
    pub messages: usize,
}

/// Histogram data for one granularity: shared axis labels plus one series
/// per group, each aligned to the labels.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HistogramTable {
    pub granularity: Granularity,
    pub labels: Vec<String>,
    pub series: Vec<HistogramSeries>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HistogramSeries {
    pub label: String,
    pub data: Vec<usize>,
}

impl StatisticsResult {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stats file: {}", path.display()))?;

        let stats: StatisticsResult = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON from: {}", path.display()))?;

        Ok(stats)
    }

    pub fn year(&self, year: i32) -> Option<&YearSummary> {
        self.years.iter().find(|y| y.year == year)
    }

    pub fn histogram(&self, granularity: Granularity) -> Option<&HistogramTable> {
        self.histograms
            .iter()
            .find(|table| table.granularity == granularity)
    }

    #[cfg(test)]
    /// Validate stats JSON against the JSON schema
    pub fn validate_with_schema(stats_json: &serde_json::Value, schema: &JSONSchema) -> Result<()> {
        match schema.validate(stats_json) {
            Ok(_) => Ok(()),
            Err(errors) => {
                let error_messages: Vec<String> = errors
                    .map(|e| format!("  - {}: {}", e.instance_path, e))
                    .collect();
                bail!("Stats validation failed:\n{}", error_messages.join("\n"))
            }
        }
    }

    #[cfg(test)]
    /// Load and compile the JSON schema
    pub fn load_schema(schema_path: &Path) -> Result<JSONSchema> {
        let schema_content = std::fs::read_to_string(schema_path)
            .with_context(|| format!("Failed to read schema file: {}", schema_path.display()))?;

        let schema_json: serde_json::Value =
            serde_json::from_str(&schema_content).with_context(|| {
                format!(
                    "Failed to parse schema JSON from: {}",
                    schema_path.display()
                )
            })?;

        JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema_json)
            .map_err(|e| anyhow!("Failed to compile JSON schema: {}", e))
    }
}

impl HistogramTable {
    pub fn series(&self, label: &str) -> Option<&HistogramSeries> {
        self.series.iter().find(|s| s.label == label)
    }
}
