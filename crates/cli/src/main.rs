//! # sheetviz-cli
//!
//! Clean a spreadsheet and chart its sheets from the command line.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use sheetviz_viz::{ColumnRole, Pipeline, PipelineConfig, RunReport, SheetReport};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// sheetviz - clean spreadsheets and chart their columns
#[derive(Parser)]
#[command(name = "sheetviz")]
#[command(author, version, about = "Clean a spreadsheet and render charts per sheet", long_about = None)]
struct Cli {
    /// Spreadsheet to process (.xlsx, .xls, .ods)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// YAML configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for chart images
    #[arg(short = 'r', long = "results", value_name = "DIR")]
    results: Option<PathBuf>,

    /// Directory for the cleaned workbook
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    output: Option<PathBuf>,

    /// Do not write the cleaned workbook
    #[arg(long = "no-cleaned")]
    no_cleaned: bool,

    /// Report format (table, json)
    #[arg(short = 'f', long = "format", default_value = "table")]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Output format for the run report.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// JSON output
    Json,
    /// Human-readable summary (default)
    #[default]
    Table,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    let config = build_config(&cli)?;
    let pipeline = Pipeline::new(config).context("Invalid configuration")?;
    let report = pipeline
        .run(&cli.file)
        .with_context(|| format!("Failed to process {}", cli.file.display()))?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => print!("{}", format_report(&report)),
    }
    Ok(())
}

/// Configuration file (or defaults) with command-line overrides applied.
///
/// Without a configuration file, the cleaned workbook goes next to the input.
fn build_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => PipelineConfig {
            upload_dir: input_dir(&cli.file),
            ..PipelineConfig::default()
        },
    };
    if let Some(results) = &cli.results {
        config.result_dir.clone_from(results);
    }
    if let Some(output) = &cli.output {
        config.output_dir = Some(output.clone());
    }
    if cli.no_cleaned {
        config.write_cleaned = false;
    }
    Ok(config)
}

fn input_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn role_label(role: ColumnRole) -> &'static str {
    match role {
        ColumnRole::Quantity => "quantity",
        ColumnRole::MonetaryAmount => "amount",
        ColumnRole::ProductIdentifier => "product",
        ColumnRole::Unclassified => "other",
    }
}

/// Human-readable run summary.
fn format_report(report: &RunReport) -> String {
    let mut out = String::new();
    for sheet in &report.sheets {
        format_sheet(&mut out, sheet);
    }
    match &report.cleaned_path {
        Some(path) => {
            let _ = writeln!(out, "{} {}", "Cleaned workbook:".bold(), path.display());
        }
        None => {
            let _ = writeln!(out, "{}", "Cleaned workbook not written".dimmed());
        }
    }
    let _ = writeln!(out, "{} chart(s) written", report.chart_count());
    out
}

fn format_sheet(out: &mut String, sheet: &SheetReport) {
    let _ = writeln!(
        out,
        "{} {} ({} rows, {} columns)",
        "Sheet".cyan().bold(),
        sheet.name.bold(),
        sheet.rows,
        sheet.columns
    );
    for role in [
        ColumnRole::Quantity,
        ColumnRole::MonetaryAmount,
        ColumnRole::ProductIdentifier,
        ColumnRole::Unclassified,
    ] {
        let columns = sheet.classification.columns(role);
        if !columns.is_empty() {
            let _ = writeln!(out, "  {:<9} {}", role_label(role), columns.join(", "));
        }
    }
    if sheet.charts.is_empty() && sheet.failures.is_empty() {
        let _ = writeln!(out, "  {}", "no charts".dimmed());
    }
    for chart in &sheet.charts {
        let _ = writeln!(
            out,
            "  {} {:<10} {}",
            "✓".green(),
            chart.artifact.kind.slug(),
            chart.artifact.path.display()
        );
    }
    for warning in &sheet.warnings {
        let _ = writeln!(
            out,
            "  {} {} non-numeric value(s) ignored in '{}'",
            "!".yellow(),
            warning.dropped,
            warning.column
        );
    }
    for failure in &sheet.failures {
        let _ = writeln!(
            out,
            "  {} {:<10} {}",
            "✗".red(),
            failure.kind.slug(),
            failure.error
        );
    }
}
