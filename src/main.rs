//! backtally - estimate what a backup will transfer.
//!
//! Usage:
//!   backtally [PATH]                      Measure a path
//!   backtally [PATH] -e PATTERN           Exclude a path, or a directory's contents
//!   backtally [PATH] --exclude-from FILE  Read exclude patterns from a file
//!   backtally --help                      Show help

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};

use backtally_core::{ByteFormat, pretty_bytes, split_pattern_blob};
use backtally_scan::{ScanConfig, Scanner};

#[derive(Parser)]
#[command(
    name = "backtally",
    version,
    about = "Estimate what a backup will transfer",
    long_about = "backtally measures the total size and distinct file count of a path\n\
                  after applying backup-style exclude patterns and hardlink\n\
                  deduplication, so the numbers shown match what a backup run\n\
                  would actually copy."
)]
struct Cli {
    /// Path to measure (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Exclude pattern; a trailing `/` excludes a directory's contents only
    #[arg(short = 'e', long = "exclude", value_name = "PATTERN")]
    exclude: Vec<String>,

    /// File with one exclude pattern per line (blank lines ignored)
    #[arg(long, value_name = "FILE")]
    exclude_from: Option<PathBuf>,

    /// Display the size in binary units (KiB) instead of decimal (KB)
    #[arg(short, long)]
    binary: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut patterns = Vec::new();
    if let Some(ref file) = cli.exclude_from {
        let blob = std::fs::read_to_string(file)
            .with_context(|| format!("Reading exclude file {}", file.display()))?;
        patterns.extend(split_pattern_blob(&blob));
    }
    patterns.extend(cli.exclude.iter().cloned());

    let config = ScanConfig::builder()
        .root(&cli.path)
        .exclude_patterns(patterns)
        .build()
        .context("Invalid configuration")?;

    eprintln!("Measuring {}...", cli.path.display());

    let report = Scanner::new().scan(&config).context("Scan failed")?;

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            let style = if cli.binary {
                ByteFormat::BINARY
            } else {
                ByteFormat::METRIC
            };
            let pretty = pretty_bytes(report.total_size_bytes() as f64, style);

            println!();
            println!("{}", "─".repeat(60));
            println!(" {} - {}", report.root.display(), pretty);
            println!(
                " {} bytes in {} files",
                report.total_size_bytes(),
                report.file_count()
            );
            println!(" Measured in {:.2}s", report.duration.as_secs_f64());
            println!("{}", "─".repeat(60));

            if report.has_warnings() {
                println!();
                println!("{} warning(s) during scan", report.warnings.len());
            }
        }
    }

    Ok(())
}
