//! Toolchain Benchmark Report
//!
//! Summarises recorded dev-server latency samples (legacy vs. turbo bundler)
//! and renders comparison charts.
//!
//! Outputs:
//! - Statistical analysis on stdout
//! - HMR comparison, scalability projection and summary charts (PNG)
//! - Optional JSON export of the analysis

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io;
use std::path::PathBuf;

use toolchain_benchmark::charts::{self, ChartConfig, ChartData, ChartKind};
use toolchain_benchmark::input;
use toolchain_benchmark::{Report, SampleSet, SeriesId};

/// Report configuration.
#[derive(Parser, Debug, Clone)]
#[command(name = "toolchain-benchmark")]
#[command(about = "Summarise dev-server latency samples and render comparison charts")]
pub struct Config {
    /// Output directory for chart images
    #[arg(short, long, default_value = "results/charts")]
    pub output_dir: PathBuf,

    /// Chart resolution in dots per inch (1-1200)
    #[arg(
        long,
        default_value_t = 300,
        value_parser = clap::value_parser!(u32).range(1..=charts::MAX_DPI as i64)
    )]
    pub dpi: u32,

    /// Print the analysis without rendering charts
    #[arg(long, default_value_t = false)]
    pub skip_charts: bool,

    /// JSON file overriding recorded samples (keys: legacy_cold, turbo_cold, legacy_hmr, turbo_hmr)
    #[arg(short, long)]
    pub samples: Option<PathBuf>,

    /// Dev-server log to extract a sample from, as SERIES=PATH (can be specified multiple times)
    #[arg(long = "log", value_parser = parse_log_arg)]
    pub logs: Vec<(SeriesId, PathBuf)>,

    /// Also write the analysis as JSON to this file
    #[arg(long)]
    pub json: Option<PathBuf>,
}

fn parse_log_arg(arg: &str) -> Result<(SeriesId, PathBuf), String> {
    let (series, path) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected SERIES=PATH, got '{}'", arg))?;
    if path.is_empty() {
        return Err(format!("missing log path for '{}'", series));
    }
    Ok((series.parse()?, PathBuf::from(path)))
}

fn banner(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{}", title);
    println!("{}", "=".repeat(60));
}

fn load_samples(config: &Config) -> Result<SampleSet> {
    let mut samples = SampleSet::recorded();

    if let Some(path) = &config.samples {
        println!("\nSample file: {}", path.display());
        samples = input::load_sample_file(path)?.apply(samples);
    }

    for (series, path) in &config.logs {
        let values = input::load_log_sample(path, series.metric)?;
        println!(
            "  {}: {} runs from {}",
            series.label(),
            values.len(),
            path.display()
        );
        samples = samples.with_override(*series, values);
    }

    Ok(samples)
}

fn render_charts(report: &Report, config: &Config) -> Result<Vec<PathBuf>> {
    let chart_config = ChartConfig {
        output_dir: config.output_dir.clone(),
        dpi: config.dpi,
    };
    let data = ChartData::from_report(report)?;

    charts::prepare_output_dir(&chart_config)?;
    println!("\nOutput directory: {}", chart_config.output_dir.display());

    let pb = ProgressBar::new(ChartKind::ALL.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Rendering charts [{bar:40}] {pos}/{len} {msg}")
            .context("Invalid progress bar template")?,
    );

    let mut paths = Vec::new();
    for kind in ChartKind::ALL {
        pb.set_message(kind.description());
        paths.push(charts::render(kind, &data, &chart_config)?);
        pb.inc(1);
    }
    pb.finish_with_message("done");

    Ok(paths)
}

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::parse();

    println!("{}", "=".repeat(60));
    println!("Toolchain Benchmark Report");
    println!("{}", "=".repeat(60));
    println!("\nConfiguration:");
    println!("  Output directory: {}", config.output_dir.display());
    println!("  DPI: {}", config.dpi);
    println!("  Charts: {}", if config.skip_charts { "skipped" } else { "enabled" });
    println!("  Log overrides: {}", config.logs.len());

    // Step 1: Samples
    banner("Step 1: Loading Samples");
    let samples = load_samples(&config)?;
    for sample in samples.iter() {
        println!("  {}: {} runs", sample.series().label(), sample.len());
    }

    // Analysis
    let report = Report::build(&samples).context("Failed to analyse samples")?;
    println!();
    report.write_text(&mut io::stdout().lock())?;

    if let Some(path) = &config.json {
        fs::write(path, report.to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("\nJSON report: {}", path.display());
    }

    // Step 2: Charts
    if !config.skip_charts {
        banner("Step 2: Generating Charts");
        let paths = render_charts(&report, &config)?;

        println!("\nGenerated {} charts:", paths.len());
        for path in &paths {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            println!("  - {}", name);
        }
        println!("\nCharts are ready ({} DPI, PNG format)", config.dpi);
    }

    println!("\n{}", "=".repeat(60));
    println!("Report Complete!");
    println!("{}", "=".repeat(60));

    Ok(())
}
