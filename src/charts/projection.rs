//! Values plotted by the charts.
//!
//! Small-project HMR and cold start come from the analysed samples. The
//! medium project was measured in a separate run; large and enterprise are
//! projections from the observed scaling, linear for the legacy toolchain
//! and constant for turbo.

use anyhow::{Context, Result};

use crate::data::{Metric, SeriesId};
use crate::report::Report;

pub const PLATFORM: &str = "Apple M1";
pub const FRAMEWORK: &str = "Next.js 14";

const MEDIUM_HMR: (f64, f64) = (205.29, 24.07);
const LARGE_HMR: (f64, f64) = (320.0, 25.0);
const ENTERPRISE_HMR: (f64, f64) = (700.0, 25.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectSize {
    Small,
    Medium,
    Large,
    Enterprise,
}

impl ProjectSize {
    pub const ALL: [ProjectSize; 4] = [
        ProjectSize::Small,
        ProjectSize::Medium,
        ProjectSize::Large,
        ProjectSize::Enterprise,
    ];

    /// Short name; projected sizes carry a `*`.
    pub fn name(&self) -> &'static str {
        match self {
            ProjectSize::Small => "Small",
            ProjectSize::Medium => "Medium",
            ProjectSize::Large => "Large*",
            ProjectSize::Enterprise => "Enterprise*",
        }
    }

    /// Approximate component count of the project.
    pub fn components(&self) -> &'static str {
        match self {
            ProjectSize::Small => "~10",
            ProjectSize::Medium => "50",
            ProjectSize::Large => "200",
            ProjectSize::Enterprise => "1000+",
        }
    }

    pub fn is_projected(&self) -> bool {
        matches!(self, ProjectSize::Large | ProjectSize::Enterprise)
    }
}

/// Mean HMR latency of both toolchains at one project size, in ms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HmrPoint {
    pub size: ProjectSize,
    pub legacy: f64,
    pub turbo: f64,
}

impl HmrPoint {
    pub fn speedup(&self) -> f64 {
        self.legacy / self.turbo
    }

    /// `6.18×` for measured sizes, `~12.8×` for projected ones.
    pub fn speedup_label(&self) -> String {
        if self.size.is_projected() {
            format!("~{}×", (self.speedup() * 10.0).round() / 10.0)
        } else {
            format!("{:.2}×", self.speedup())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub hmr: Vec<HmrPoint>,
    pub cold_start_legacy: f64,
    pub cold_start_turbo: f64,
    pub sample_size: Option<usize>,
}

impl ChartData {
    pub fn from_report(report: &Report) -> Result<Self> {
        let mean = |series: SeriesId| {
            report
                .summary(series)
                .map(|s| s.mean)
                .with_context(|| format!("Report has no '{}' summary", series.label()))
        };

        let small = HmrPoint {
            size: ProjectSize::Small,
            legacy: mean(SeriesId::LEGACY_HMR)?,
            turbo: mean(SeriesId::TURBO_HMR)?,
        };
        let fixed = |size, (legacy, turbo): (f64, f64)| HmrPoint {
            size,
            legacy,
            turbo,
        };

        let first = report.summaries.first().map(|s| s.count);
        let sample_size = first.filter(|n| report.summaries.iter().all(|s| s.count == *n));

        Ok(Self {
            hmr: vec![
                small,
                fixed(ProjectSize::Medium, MEDIUM_HMR),
                fixed(ProjectSize::Large, LARGE_HMR),
                fixed(ProjectSize::Enterprise, ENTERPRISE_HMR),
            ],
            cold_start_legacy: mean(SeriesId::LEGACY_COLD)?,
            cold_start_turbo: mean(SeriesId::TURBO_COLD)?,
            sample_size,
        })
    }

    pub fn hmr_point(&self, size: ProjectSize) -> Option<&HmrPoint> {
        self.hmr.iter().find(|p| p.size == size)
    }

    pub fn measured(&self) -> impl Iterator<Item = &HmrPoint> {
        self.hmr.iter().filter(|p| !p.size.is_projected())
    }

    pub fn cold_start_speedup(&self) -> f64 {
        self.cold_start_legacy / self.cold_start_turbo
    }

    pub fn sample_note(&self) -> String {
        match self.sample_size {
            Some(n) => format!("N={}", n),
            None => "N varies".to_string(),
        }
    }

    pub fn speedup_for(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::ColdStart => Some(self.cold_start_speedup()),
            Metric::Hmr => self.hmr_point(ProjectSize::Small).map(HmrPoint::speedup),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SampleSet;

    fn recorded() -> ChartData {
        let report = Report::build(&SampleSet::recorded()).unwrap();
        ChartData::from_report(&report).unwrap()
    }

    #[test]
    fn small_project_and_cold_start_come_from_samples() {
        let data = recorded();
        let small = data.hmr_point(ProjectSize::Small).unwrap();
        assert_eq!(format!("{:.2}", small.legacy), "163.27");
        assert_eq!(format!("{:.2}", small.turbo), "26.43");
        assert_eq!(format!("{:.2}", data.cold_start_legacy), "1285.30");
        assert_eq!(format!("{:.2}", data.cold_start_turbo), "569.27");
        assert_eq!(data.sample_note(), "N=30");
    }

    #[test]
    fn speedup_labels() {
        let data = recorded();
        let labels: Vec<String> = data.hmr.iter().map(HmrPoint::speedup_label).collect();
        assert_eq!(labels, vec!["6.18×", "8.53×", "~12.8×", "~28×"]);
        assert_eq!(format!("{:.2}", data.cold_start_speedup()), "2.26");
    }

    #[test]
    fn measured_sizes() {
        let data = recorded();
        let sizes: Vec<ProjectSize> = data.measured().map(|p| p.size).collect();
        assert_eq!(sizes, vec![ProjectSize::Small, ProjectSize::Medium]);
        assert_eq!(
            data.speedup_for(Metric::Hmr),
            data.hmr_point(ProjectSize::Small).map(HmrPoint::speedup)
        );
    }
}
