//! PNG charts of the benchmark results.

mod hmr;
pub mod projection;
mod scalability;
pub mod style;
mod summary;

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub use projection::{ChartData, HmrPoint, ProjectSize};
pub use style::Canvas;

/// Highest resolution accepted for chart output.
pub const MAX_DPI: u32 = 1200;

/// Category index for an axis tick that falls on a whole number.
fn index_at(value: f64) -> Option<usize> {
    let rounded = value.round();
    if rounded < 0.0 || (value - rounded).abs() > 1e-6 {
        return None;
    }
    Some(rounded as usize)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    HmrComparison,
    ScalabilityProjection,
    SummaryInfographic,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [
        ChartKind::HmrComparison,
        ChartKind::ScalabilityProjection,
        ChartKind::SummaryInfographic,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            ChartKind::HmrComparison => "chart1_hmr_comparison.png",
            ChartKind::ScalabilityProjection => "chart2_scalability_projection.png",
            ChartKind::SummaryInfographic => "chart3_summary_infographic.png",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ChartKind::HmrComparison => "HMR latency comparison",
            ChartKind::ScalabilityProjection => "Scalability projection",
            ChartKind::SummaryInfographic => "Summary infographic",
        }
    }
}

/// Where and how large charts are written.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub output_dir: PathBuf,
    pub dpi: u32,
}

impl ChartConfig {
    pub fn validate(&self) -> Result<()> {
        if self.dpi == 0 || self.dpi > MAX_DPI {
            bail!("DPI must be between 1 and {}, got {}", MAX_DPI, self.dpi);
        }
        Ok(())
    }

    pub fn path_for(&self, kind: ChartKind) -> PathBuf {
        self.output_dir.join(kind.file_name())
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("results/charts"),
            dpi: 300,
        }
    }
}

pub fn prepare_output_dir(config: &ChartConfig) -> Result<()> {
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output_dir.display()
        )
    })
}

/// Draw one chart and return the file it was written to.
pub fn render(kind: ChartKind, data: &ChartData, config: &ChartConfig) -> Result<PathBuf> {
    config.validate()?;
    let path = config.path_for(kind);
    let canvas = Canvas::new(config.dpi);
    tracing::debug!("rendering {:?} to {}", kind, path.display());

    draw(kind, &path, data, &canvas)
        .with_context(|| format!("Failed to render {}", path.display()))?;

    tracing::info!("saved {}", path.display());
    Ok(path)
}

fn draw(kind: ChartKind, path: &Path, data: &ChartData, canvas: &Canvas) -> Result<()> {
    match kind {
        ChartKind::HmrComparison => hmr::draw(path, data, canvas),
        ChartKind::ScalabilityProjection => scalability::draw(path, data, canvas),
        ChartKind::SummaryInfographic => summary::draw(path, data, canvas),
    }
}

/// Draw every chart into `config.output_dir`, creating it if needed.
pub fn render_all(data: &ChartData, config: &ChartConfig) -> Result<Vec<PathBuf>> {
    config.validate()?;
    prepare_output_dir(config)?;
    ChartKind::ALL
        .iter()
        .map(|kind| render(*kind, data, config))
        .collect()
}
