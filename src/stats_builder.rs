/// Statistics aggregation and generation module.
///
/// Turns a parsed chat export into a `StatisticsResult`:
/// - Classifies records and parses their dates once
/// - Breaks messages, joins and invites down per year
/// - Ranks top senders overall and per year
/// - Builds zero-filled histograms per configured granularity
/// - Computes peaks
use chrono::{Datelike, Local};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use tracing::{debug, info};

use crate::calendar::{index_events, index_messages, Granularity, IndexedEvent, IndexedMessage};
use crate::classify::classify;
use crate::config::{GroupingScheme, StatsOptions};
use crate::error::{Result, StatsError};
use crate::export::ChatExport;
use crate::group::{group_by_scheme, group_by_year, GroupKey};
use crate::histogram::{build_histogram, peak_slot};
use crate::rank::{distinct_senders, top_senders, TOP_SENDERS};
use crate::stats::*;

// ============================================================================
// Intermediate Aggregation Structs (private, internal to stats_builder)
// ============================================================================

/// Records of one calendar year (private).
#[derive(Default)]
struct YearTally<'g, 'a> {
    messages: Vec<&'g IndexedMessage<'a>>,
    joins: usize,
    invites: usize,
}

/// Builds statistics for an export, closing the year range at the local
/// clock's current year.
pub fn build_stats(export: &ChatExport, options: &StatsOptions) -> Result<StatisticsResult> {
    build_stats_as_of(export, options, Local::now().year())
}

/// Builds statistics for an export with an explicit current year.
///
/// Pure: the same export, options and year always give the same result.
///
/// # Errors
///
/// * `MalformedTimestamp` - a classified record has an unparseable date
/// * `EmptyMessageSet` - the export contains no messages
pub fn build_stats_as_of(
    export: &ChatExport,
    options: &StatsOptions,
    current_year: i32,
) -> Result<StatisticsResult> {
    let classified = classify(&export.messages);

    // Dates are parsed here and nowhere else.
    let messages = index_messages(&classified.messages)?;
    let link_joins = index_events(&classified.link_joins)?;
    let invites = index_events(&classified.invites)?;

    let coverage = compute_coverage(&messages)?;

    // Never close the range before the last message, even with a lagging clock.
    let last_year = current_year.max(coverage.last_message_date.year());
    let year_range = coverage.first_message_date.year()..=last_year;
    debug!(
        first_year = year_range.start(),
        last_year = year_range.end(),
        "Resolved year range"
    );

    let years = build_year_summaries(&messages, &link_joins, &invites, year_range.clone());

    let summary = Summary {
        total_messages: years.iter().map(|y| y.messages).sum(),
        total_joins: years.iter().map(|y| y.joins).sum(),
        total_invites: years.iter().map(|y| y.invites).sum(),
        distinct_senders: distinct_senders(messages.iter().map(|m| m.record)),
        top_senders: top_senders(messages.iter().map(|m| m.record), TOP_SENDERS),
    };
    debug_assert_eq!(summary.total_messages, messages.len());

    let peaks = compute_peaks(&messages, &year_range);

    let histograms = options
        .granularities
        .iter()
        .map(|&granularity| {
            build_histogram_table(&messages, granularity, options.grouping, &year_range)
        })
        .collect();

    info!(
        chat = %export.name,
        messages = summary.total_messages,
        joins = summary.total_joins,
        invites = summary.total_invites,
        years = years.len(),
        "Statistics assembled"
    );

    Ok(StatisticsResult {
        schema_version: SCHEMA_VERSION,
        name: export.name.clone(),
        range_end_year: last_year,
        grouping: options.grouping,
        coverage,
        summary,
        years,
        peaks,
        histograms,
    })
}

// ============================================================================
// Helper Functions for Building Sections
// ============================================================================

/// First and last message dates (private).
fn compute_coverage(messages: &[IndexedMessage<'_>]) -> Result<Coverage> {
    let first = messages.iter().map(|m| m.at).min();
    let last = messages.iter().map(|m| m.at).max();

    match (first, last) {
        (Some(first_message_date), Some(last_message_date)) => Ok(Coverage {
            first_message_date,
            last_message_date,
        }),
        _ => Err(StatsError::EmptyMessageSet),
    }
}

/// Per-year counters for every year of the range, plus any year outside
/// it in which a join or invite happened (private).
fn build_year_summaries(
    messages: &[IndexedMessage<'_>],
    link_joins: &[IndexedEvent<'_>],
    invites: &[IndexedEvent<'_>],
    year_range: RangeInclusive<i32>,
) -> Vec<YearSummary> {
    let mut tallies: BTreeMap<i32, YearTally<'_, '_>> =
        year_range.map(|year| (year, YearTally::default())).collect();

    for (year, group) in group_by_year(messages) {
        tallies.entry(year).or_default().messages = group;
    }
    for (year, group) in group_by_year(link_joins) {
        tallies.entry(year).or_default().joins = group.len();
    }
    for (year, group) in group_by_year(invites) {
        tallies.entry(year).or_default().invites = group.len();
    }

    tallies
        .into_iter()
        .map(|(year, tally)| YearSummary {
            year,
            messages: tally.messages.len(),
            joins: tally.joins,
            invites: tally.invites,
            top_senders: top_senders(tally.messages.iter().map(|m| m.record), TOP_SENDERS),
        })
        .collect()
}

/// One histogram table: a series per year of the range, or a single flat
/// series (private).
fn build_histogram_table(
    messages: &[IndexedMessage<'_>],
    granularity: Granularity,
    grouping: GroupingScheme,
    year_range: &RangeInclusive<i32>,
) -> HistogramTable {
    let groups = group_by_scheme(messages, grouping);

    let keys: Vec<GroupKey> = match grouping {
        GroupingScheme::ByYear => year_range.clone().map(GroupKey::Year).collect(),
        GroupingScheme::Flat => vec![GroupKey::All],
    };

    let series = keys
        .into_iter()
        .map(|key| HistogramSeries {
            label: key.to_string(),
            data: build_histogram(groups.get(&key).into_iter().flatten().copied(), granularity),
        })
        .collect();

    HistogramTable {
        granularity,
        labels: granularity.labels(),
        series,
    }
}

// ============================================================================
// Helper Functions for Peaks
// ============================================================================

/// Busiest year, year-month and weekday; earliest period wins ties.
fn compute_peaks(messages: &[IndexedMessage<'_>], year_range: &RangeInclusive<i32>) -> Option<Peaks> {
    let first_year = *year_range.start();
    let by_year = group_by_year(messages);

    let year_counts: Vec<usize> = year_range
        .clone()
        .map(|year| by_year.get(&year).map_or(0, |group| group.len()))
        .collect();
    let peak_year = peak_slot(&year_counts).map(|(slot, messages)| PeakYear {
        year: first_year + slot as i32,
        messages,
    });

    // Months of the whole range laid end to end.
    let month_counts: Vec<usize> = year_range
        .clone()
        .flat_map(|year| {
            build_histogram(
                by_year.get(&year).into_iter().flatten().copied(),
                Granularity::Month,
            )
        })
        .collect();
    let peak_month = peak_slot(&month_counts).map(|(slot, messages)| PeakMonth {
        month: format!("{}-{:02}", first_year + (slot / 12) as i32, slot % 12 + 1),
        messages,
    });

    let weekday_counts = build_histogram(messages, Granularity::Weekday);
    let weekday_labels = Granularity::Weekday.labels();
    let peak_weekday = peak_slot(&weekday_counts).map(|(slot, messages)| PeakWeekday {
        weekday: weekday_labels[slot].clone(),
        messages,
    });

    if peak_year.is_none() && peak_month.is_none() && peak_weekday.is_none() {
        return None;
    }

    Some(Peaks {
        year: peak_year,
        month: peak_month,
        weekday: peak_weekday,
    })
}
