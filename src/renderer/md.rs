use crate::calendar::Granularity;
use crate::config::GroupingScheme;
use crate::stats::*;
use anyhow::Result;

/// Render stats to a Markdown report
pub fn render(stats: &StatisticsResult) -> Result<String> {
    let mut output = String::new();

    // 1. Title and coverage
    render_header(&mut output, stats);

    // 2. Summary
    render_summary(&mut output, &stats.summary);

    // 3. Per-year breakdown
    render_years(&mut output, &stats.years);

    // 4. Activity
    render_activity(&mut output, stats);

    Ok(output)
}

fn render_header(output: &mut String, stats: &StatisticsResult) {
    output.push_str(&format!("# 💬 Chat statistics — {}\n", stats.name));
    output.push_str(&format!(
        "- **First message:** {}\n",
        stats.coverage.first_message_date.format("%Y-%m-%d %H:%M")
    ));
    output.push_str(&format!(
        "- **Last message:** {}\n",
        stats.coverage.last_message_date.format("%Y-%m-%d %H:%M")
    ));
    output.push('\n');
}

fn render_summary(output: &mut String, summary: &Summary) {
    output.push_str("### 📊 Summary\n");
    output.push_str(&format!(
        "- 💬 **Messages:** {}\n",
        format_number(summary.total_messages)
    ));
    output.push_str(&format!(
        "- 🔗 **Joined by link:** {}\n",
        format_number(summary.total_joins)
    ));
    output.push_str(&format!(
        "- ✉️ **Invited:** {}\n",
        format_number(summary.total_invites)
    ));
    output.push_str(&format!(
        "- 👥 **Distinct senders:** {}\n",
        format_number(summary.distinct_senders)
    ));
    output.push('\n');

    if !summary.top_senders.is_empty() {
        output.push_str("**Top senders**\n\n");
        render_sender_table(output, &summary.top_senders);
    }
}

fn render_years(output: &mut String, years: &[YearSummary]) {
    if years.is_empty() {
        return;
    }

    output.push_str("### 📆 By year\n");
    output.push_str("| Year | Messages | Joins | Invites | Top senders |\n");
    output.push_str("| ---- | -------- | ----- | ------- | ----------- |\n");

    for year in years {
        let top = if year.top_senders.is_empty() {
            String::from("-")
        } else {
            year.top_senders
                .iter()
                .map(|entry| {
                    format!(
                        "{} ({})",
                        escape_cell(&entry.sender.display_name()),
                        format_number(entry.messages)
                    )
                })
                .collect::<Vec<_>>()
                .join(", ")
        };

        output.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            year.year,
            format_number(year.messages),
            format_number(year.joins),
            format_number(year.invites),
            top
        ));
    }
    output.push('\n');
}

fn render_sender_table(output: &mut String, senders: &[SenderCount]) {
    output.push_str("| Rank | Name | ID | Messages |\n");
    output.push_str("| ---- | ---- | -- | -------- |\n");

    for (i, entry) in senders.iter().enumerate() {
        output.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            i + 1,
            escape_cell(&entry.sender.display_name()),
            entry.sender.from_id,
            format_number(entry.messages)
        ));
    }
    output.push('\n');
}

fn render_activity(output: &mut String, stats: &StatisticsResult) {
    if stats.histograms.is_empty() && stats.peaks.is_none() {
        return;
    }

    output.push_str("### 📈 Activity\n");

    // Peaks come first inside Activity
    if let Some(ref peaks) = stats.peaks {
        render_peaks(output, peaks);
    }

    for table in &stats.histograms {
        render_histogram(output, table, stats.grouping);
    }
}

fn render_peaks(output: &mut String, peaks: &Peaks) {
    let mut lines: Vec<String> = Vec::new();

    if let Some(ref year) = peaks.year {
        lines.push(format!(
            "- 🗓️ **Peak year:** {} ({} messages)",
            year.year,
            format_number(year.messages)
        ));
    }

    if let Some(ref month) = peaks.month {
        lines.push(format!(
            "- 📆 **Peak month:** {} ({} messages)",
            month.month,
            format_number(month.messages)
        ));
    }

    if let Some(ref weekday) = peaks.weekday {
        lines.push(format!(
            "- 📅 **Peak weekday:** {} ({} messages)",
            weekday.weekday,
            format_number(weekday.messages)
        ));
    }

    if lines.is_empty() {
        return;
    }

    output.push_str("#### 🚀 Peaks\n");
    for line in lines {
        output.push_str(&line);
        output.push('\n');
    }
    output.push('\n');
}

/// One table per histogram: a column per slot, a row per series.
/// Months and hours are split in two halves to keep rows readable.
fn render_histogram(output: &mut String, table: &HistogramTable, grouping: GroupingScheme) {
    let title = match table.granularity {
        Granularity::Month => "#### 📆 By month\n",
        Granularity::Weekday => "#### 📅 By weekday\n",
        Granularity::Hour => "#### 🕐 By hour\n",
    };
    output.push_str(title);

    let row_header = match grouping {
        GroupingScheme::ByYear => "Year",
        GroupingScheme::Flat => "Period",
    };

    let short_labels: Vec<String> = match table.granularity {
        Granularity::Month | Granularity::Weekday => {
            table.labels.iter().map(|l| l.chars().take(3).collect()).collect()
        }
        Granularity::Hour => table.labels.clone(),
    };

    let halves: Vec<std::ops::Range<usize>> = match table.granularity {
        Granularity::Weekday => vec![0..short_labels.len()],
        Granularity::Month | Granularity::Hour => {
            let mid = short_labels.len() / 2;
            vec![0..mid, mid..short_labels.len()]
        }
    };

    for (i, range) in halves.into_iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        output.push_str(&format!("| {} |", row_header));
        for label in &short_labels[range.clone()] {
            output.push_str(&format!(" {} |", label));
        }
        output.push('\n');

        output.push_str(&format!("| {} |", "-".repeat(row_header.len())));
        for label in &short_labels[range.clone()] {
            output.push_str(&format!(" {} |", "-".repeat(label.len())));
        }
        output.push('\n');

        for series in &table.series {
            output.push_str(&format!("| {} |", series.label));
            for slot in range.clone() {
                let count = series.data.get(slot).copied().unwrap_or(0);
                output.push_str(&format!(" {} |", format_number(count)));
            }
            output.push('\n');
        }
    }
    output.push('\n');
}

/// Format a number with thousand separators (raw integers, no abbreviation)
fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut grouped_rev = String::new();

    // Insert commas every three digits, starting from the right
    for (count, ch) in digits.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            grouped_rev.push(',');
        }
        grouped_rev.push(ch);
    }

    grouped_rev.chars().rev().collect()
}

/// Sender names are free text; keep them from breaking table rows.
fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}
