//! pclosure - Command-line interface for percentile range closure
//!
//! Usage:
//!   pclosure <file>                                   # Close every distribution, print a summary
//!   pclosure <file> --percent-bar percentBar-0-50-90-100 -o json
//!   pclosure <file> --ranges p0p50,p90p100 --year 2019 -o json
//!   pclosure <file> --repair --percent-bar percentBar-0-90-99-99.9-100 -o layout

use clap::{Parser, ValueEnum};
use percentile_closure::engine::config::{DEFAULT_MARKER, DEFAULT_TOLERANCE};
use percentile_closure::export::{save_export_json, save_layout_json, ExportDocument, LayoutDocument};
use percentile_closure::prep::batch::ClosedSeries;
use percentile_closure::prep::repair::SeriesRepair;
use percentile_closure::{
    close_dataset, BatchOptions, ClosedDataset, ClosureConfig, ConflictPolicy, Dataset, LayoutConfig,
    RangeSelection, TableConfig,
};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pclosure")]
#[command(version)]
#[command(about = "Derive every percentile-range share implied by sparse measurements")]
#[command(long_about = "Read a semicolon-delimited percentile table, close every (year, series) \
distribution and print the resulting ranges")]
struct Cli {
    /// Input table: metadata row, `Percentile;Year;...` header, one row per range and year
    #[arg(value_name = "FILE")]
    file: String,

    /// Fill a single blank size per series with the remaining mass before closing
    #[arg(long)]
    repair: bool,

    /// Comma-separated range labels to keep (e.g. p0p50,p90p100)
    #[arg(long, value_name = "LABELS", value_delimiter = ',', conflicts_with = "percent_bar")]
    ranges: Vec<String>,

    /// Keep the consecutive ranges of a percent-bar descriptor (e.g. percentBar-0-50-90-100)
    #[arg(long, value_name = "DESC")]
    percent_bar: Option<String>,

    /// Handling of disagreeing measurements: reject or warn
    #[arg(long, default_value = "reject", value_name = "POLICY")]
    conflicts: ConflictPolicy,

    /// Absolute tolerance for conflict detection
    #[arg(long, default_value_t = DEFAULT_TOLERANCE, value_name = "X")]
    tolerance: f64,

    /// Character separating the breakpoints of a range label
    #[arg(long, default_value_t = DEFAULT_MARKER, value_name = "C")]
    marker: char,

    /// Metadata rows preceding the column-name row
    #[arg(long, default_value_t = 1, value_name = "N")]
    skip_rows: usize,

    /// Only close distributions of this year
    #[arg(long, value_name = "YEAR")]
    year: Option<String>,

    /// Only close this series
    #[arg(long, value_name = "SERIES")]
    series: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary, value_name = "FORMAT")]
    output: OutputFormat,

    /// Fail when any distribution cannot be closed instead of reporting it
    #[arg(long)]
    strict: bool,

    /// Log pipeline progress at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Ranges per distribution, human readable
    Summary,
    /// Nested year → series → ranges document
    Json,
    /// Stacked-bar segments per series
    Layout,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let source = match std::fs::read_to_string(&cli.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", cli.file, e);
            process::exit(1);
        }
    };

    let table = TableConfig {
        header_rows_to_skip: cli.skip_rows,
    };
    let mut dataset = match Dataset::from_source(&source, &table) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Parse/validation error: {}", e);
            process::exit(1);
        }
    };
    dataset.retain(|key| {
        cli.year.as_deref().map_or(true, |y| key.year == y)
            && cli.series.as_deref().map_or(true, |s| key.series == s)
    });
    tracing::debug!(groups = dataset.len(), "selected distributions");

    let selection = match build_selection(&cli) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Invalid range selection: {}", e);
            process::exit(1);
        }
    };

    let options = BatchOptions {
        closure: ClosureConfig::default()
            .with_marker(cli.marker)
            .with_tolerance(cli.tolerance)
            .with_conflicts(cli.conflicts),
        repair: cli.repair,
        selection,
    };

    let closed = close_dataset(&dataset, &options);
    let closed = if cli.strict {
        match closed.require_all_closed() {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Closure error: {}", e);
                process::exit(1);
            }
        }
    } else if cli.output != OutputFormat::Summary {
        for (key, e) in &closed.failed {
            eprintln!("Warning: distribution '{}' not closed: {}", key, e);
        }
        closed
    } else {
        closed
    };

    match cli.output {
        OutputFormat::Json => {
            let document = ExportDocument::from_closed(&closed, cli.marker);
            match save_export_json(&document) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing to JSON: {}", e);
                    process::exit(1);
                }
            }
        }
        OutputFormat::Layout => {
            let layout = LayoutDocument::from_closed(
                &closed,
                &LayoutConfig::default(),
                cli.percent_bar.as_deref(),
            )
            .and_then(|doc| save_layout_json(&doc));
            match layout {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Layout error: {}", e);
                    process::exit(1);
                }
            }
        }
        OutputFormat::Summary => print_summary(&cli.file, &closed, cli.marker),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_selection(cli: &Cli) -> Result<Option<RangeSelection>, percentile_closure::ClosureError> {
    if let Some(descriptor) = &cli.percent_bar {
        return RangeSelection::from_percent_bar(descriptor).map(Some);
    }
    if cli.ranges.is_empty() {
        return Ok(None);
    }
    RangeSelection::from_labels(&cli.ranges, cli.marker).map(Some)
}

fn print_summary(file: &str, closed: &ClosedDataset, marker: char) {
    println!("✓ Closed {} distribution(s) from '{}'\n", closed.len(), file);

    for (key, series) in &closed.series {
        print_series(&key.to_string(), series, marker);
    }

    if !closed.failed.is_empty() {
        println!("Failed ({}):", closed.failed.len());
        for (key, e) in &closed.failed {
            println!("  {}: {}", key, e);
        }
        println!();
    }

    if !closed.skipped.is_empty() {
        println!("Skipped ({}):", closed.skipped.len());
        for key in &closed.skipped {
            println!("  {}: no measured sizes", key);
        }
    }
}

fn print_series(name: &str, series: &ClosedSeries, marker: char) {
    let stats = series.closure.stats();
    println!(
        "{}: {} ranges, {} breakpoints ({} unreachable)",
        name,
        series.closure.len(),
        stats.reached,
        stats.unreachable
    );
    match &series.repair {
        Some(SeriesRepair::Repaired { label, size }) => {
            println!("  repaired {} = {:.6}", label, size)
        }
        Some(SeriesRepair::Unrepairable { missing }) => {
            println!("  not repaired: {} sizes missing", missing)
        }
        _ => {}
    }
    if !series.is_complete() {
        let missing: Vec<String> = series.missing.iter().map(|r| r.to_string()).collect();
        println!("  missing selected ranges: {}", missing.join(", "));
    }
    for record in &series.records {
        println!("  {} = {:.6}", record.label(marker), record.size);
    }
    println!();
}
