use anyhow::{bail, Context, Result};
use chatstats::{build_stats, logging, renderer, ChatExport, StatisticsResult, StatsOptions};
use clap::Parser;
use std::path::PathBuf;

// Help text constants
const HELP_MAIN: &str = "\
chatstats — usage statistics for an exported chat history

Commands:
    --input <path>       Aggregate a chat export (JSON) and write reports.
    --json-stats <path>  Re-render a stats JSON written by a previous run.

Usage:
    chatstats --input <export.json> [--render md,json] [--output <dir>]

More help:
    chatstats --help render
    chatstats --help stats";

const HELP_RENDER: &str = "\
Render reports (md,json)

Usage:
    chatstats --input <export.json> [--render formats] [--output <dir>]
    chatstats --json-stats <stats.json> [--render md] [--output <dir>]

Options:
    --render [formats]   Comma-separated formats (md,json). Empty renders all.
    --output <dir>       Output directory (default: current dir). Filenames are derived from the chat name.

Examples:
  chatstats --input result.json
  chatstats --input result.json --render md --output reports";

const HELP_STATS: &str = "\
Aggregation options

Options:
    --grouping <scheme>      by-year (default): one histogram series per year, from the
                             first message year to the current year.
                             flat: a single series over the whole export.
    --granularity <list>     Comma-separated histograms: month, weekday, hour
                             (default: month,weekday).

Examples:
  chatstats --input result.json --grouping flat --granularity month,hour";

#[derive(Parser)]
#[command(name = "chatstats", disable_help_flag = true)]
#[command(about = "Chat export statistics", long_about = None)]
struct Cli {
    /// Chat export to aggregate (must be a .json file)
    #[arg(short, long, conflicts_with = "json_stats")]
    input: Option<PathBuf>,

    /// Previously written stats JSON to render again
    #[arg(long)]
    json_stats: Option<PathBuf>,

    /// Render formats (comma-separated: md,json). Renders all if no formats specified.
    #[arg(long)]
    render: Option<String>,

    /// Output directory (defaults to current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Histogram grouping: by-year or flat
    #[arg(long)]
    grouping: Option<String>,

    /// Histogram granularities (comma-separated: month,weekday,hour)
    #[arg(long)]
    granularity: Option<String>,

    /// Also append logs to <dir>/chatstats.log
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,

    /// Show help (global or per topic). Example: chatstats --help render
    #[arg(long, value_name = "TOPIC", num_args = 0..=1, default_missing_value = "")]
    help: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(help_topic) = cli.help {
        let topic = help_topic.trim();
        if topic.is_empty() {
            println!("{}", HELP_MAIN);
        } else if topic.eq_ignore_ascii_case("render") {
            println!("{}", HELP_RENDER);
        } else if topic.eq_ignore_ascii_case("stats") {
            println!("{}", HELP_STATS);
        } else {
            println!("Unknown help topic: {}", topic);
        }
        return Ok(());
    }

    logging::init_logging(cli.log_dir.as_deref(), cli.verbose)?;

    // Load or compute stats
    let stats = if let Some(input_path) = cli.input {
        let options =
            StatsOptions::from_args(cli.grouping.as_deref(), cli.granularity.as_deref())?;
        let export = ChatExport::load_from_file(&input_path)
            .with_context(|| format!("Rejected export: {}", input_path.display()))?;
        tracing::info!(
            records = export.messages.len(),
            "Loaded export '{}'",
            export.name
        );
        build_stats(&export, &options)
            .with_context(|| format!("Failed to aggregate: {}", input_path.display()))?
    } else if let Some(json_path) = cli.json_stats {
        StatisticsResult::load_from_file(&json_path)?
    } else {
        bail!("No action specified. Use --input to aggregate a chat export (example: chatstats --input result.json)");
    };

    // Determine output directory
    let output_dir = cli.output.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    // Parse formats
    let formats: Vec<&str> = match cli.render.as_deref() {
        None | Some("") => vec!["md", "json"],
        Some(list) => list.split(',').map(|s| s.trim()).collect(),
    };
    if !formats.iter().any(|format| matches!(*format, "md" | "json")) {
        bail!("No known render format in '{}' (expected md, json)", formats.join(","));
    }

    // Render each format
    for format in formats {
        match format {
            "md" => {
                let markdown = renderer::md::render(&stats)?;
                let output_path = output_dir.join(default_filename(&stats, "md"));
                std::fs::write(&output_path, markdown)?;
                eprintln!("Markdown report written to: {}", output_path.display());
            }
            "json" => {
                let json = serde_json::to_string_pretty(&stats)?;
                let output_path = output_dir.join(default_filename(&stats, "json"));
                std::fs::write(&output_path, json)?;
                eprintln!("Stats JSON written to: {}", output_path.display());
            }
            _ => {
                eprintln!("Warning: Unknown format '{}', skipping", format);
            }
        }
    }

    Ok(())
}

fn default_filename(stats: &StatisticsResult, extension: &str) -> String {
    let slug: String = stats
        .name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        format!("chatstats.{}", extension)
    } else {
        format!("chatstats-{}.{}", slug, extension)
    }
}
