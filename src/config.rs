/// Aggregation options.
///
/// Parses the textual forms accepted on the command line (e.g. `by-year`,
/// `flat`, `month,weekday,hour`) into the options the assembler reads.
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::calendar::Granularity;

/// How messages are split into histogram series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupingScheme {
    /// One series per calendar year, from the first message year to now.
    #[default]
    ByYear,
    /// A single series over the whole export.
    Flat,
}

impl FromStr for GroupingScheme {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "by-year" | "year" | "yearly" => Ok(GroupingScheme::ByYear),
            "flat" | "all" | "none" => Ok(GroupingScheme::Flat),
            other => Err(anyhow!(
                "Invalid grouping: '{}'. Expected: 'by-year' or 'flat'",
                other
            )),
        }
    }
}

impl FromStr for Granularity {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "month" | "months" => Ok(Granularity::Month),
            "weekday" | "weekdays" | "dow" => Ok(Granularity::Weekday),
            "hour" | "hours" => Ok(Granularity::Hour),
            other => Err(anyhow!(
                "Invalid granularity: '{}'. Expected: 'month', 'weekday' or 'hour'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StatsOptions {
    pub grouping: GroupingScheme,
    /// Histograms to build, in output order.
    pub granularities: Vec<Granularity>,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            grouping: GroupingScheme::ByYear,
            granularities: vec![Granularity::Month, Granularity::Weekday],
        }
    }
}

impl StatsOptions {
    /// Month histograms only.
    pub fn months_only() -> Self {
        Self {
            granularities: vec![Granularity::Month],
            ..Self::default()
        }
    }

    /// Builds options from optional textual flags; missing flags keep defaults.
    pub fn from_args(grouping: Option<&str>, granularities: Option<&str>) -> Result<Self> {
        let mut options = Self::default();
        if let Some(grouping) = grouping {
            options.grouping = grouping.parse()?;
        }
        if let Some(list) = granularities {
            options.granularities = parse_granularities(list)?;
        }
        Ok(options)
    }
}

/// Parses a comma-separated granularity list. Duplicates are dropped,
/// first occurrence order is kept.
pub fn parse_granularities(list: &str) -> Result<Vec<Granularity>> {
    let mut granularities = Vec::new();
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let granularity: Granularity = part.parse()?;
        if !granularities.contains(&granularity) {
            granularities.push(granularity);
        }
    }

    if granularities.is_empty() {
        return Err(anyhow!("At least one granularity is required"));
    }
    Ok(granularities)
}
