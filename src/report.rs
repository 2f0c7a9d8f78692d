//! Text and JSON rendering of the statistical analysis.

use serde::Serialize;
use std::fmt;
use std::io::{self, Write};

use crate::data::{Metric, SampleSet, SeriesId, Toolchain};
use crate::stats::{self, StatsSummary};

const RULE_WIDTH: usize = 60;

/// Ratio of legacy to turbo mean latency for one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Speedup {
    pub metric: Metric,
    pub factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variation {
    pub name: String,
    pub cv_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub summaries: Vec<StatsSummary>,
    pub speedups: Vec<Speedup>,
    pub variation: Vec<Variation>,
}

impl Report {
    pub fn build(samples: &SampleSet) -> stats::Result<Self> {
        let summaries = samples
            .iter()
            .map(|sample| sample.summarize())
            .collect::<stats::Result<Vec<_>>>()?;

        let find = |series: SeriesId| {
            let label = series.label();
            summaries.iter().find(|s| s.name == label)
        };

        let mut speedups = Vec::new();
        for metric in [Metric::ColdStart, Metric::Hmr] {
            let legacy = find(SeriesId::new(Toolchain::Legacy, metric));
            let turbo = find(SeriesId::new(Toolchain::Turbo, metric));
            if let (Some(legacy), Some(turbo)) = (legacy, turbo) {
                speedups.push(Speedup {
                    metric,
                    factor: stats::speedup(legacy, turbo)?,
                });
            }
        }

        let variation = summaries
            .iter()
            .map(|s| {
                Ok(Variation {
                    name: s.name.clone(),
                    cv_percent: s.coefficient_of_variation()?,
                })
            })
            .collect::<stats::Result<Vec<_>>>()?;

        tracing::debug!(
            "built report over {} samples, {} speedups",
            summaries.len(),
            speedups.len()
        );

        Ok(Self {
            summaries,
            speedups,
            variation,
        })
    }

    pub fn summary(&self, series: SeriesId) -> Option<&StatsSummary> {
        let label = series.label();
        self.summaries.iter().find(|s| s.name == label)
    }

    pub fn speedup(&self, metric: Metric) -> Option<f64> {
        self.speedups
            .iter()
            .find(|s| s.metric == metric)
            .map(|s| s.factor)
    }

    /// Shared sample size, if every sample has the same number of runs.
    fn common_count(&self) -> Option<usize> {
        let first = self.summaries.first()?.count;
        self.summaries
            .iter()
            .all(|s| s.count == first)
            .then_some(first)
    }

    /// Writes the text layout to `out`.
    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", self)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Plain-text layout printed by the binary.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "{}", rule)?;
        match self.common_count() {
            Some(n) => writeln!(f, "STATISTICAL ANALYSIS RESULTS (N={})", n)?,
            None => writeln!(f, "STATISTICAL ANALYSIS RESULTS")?,
        }
        writeln!(f, "{}", rule)?;

        for s in &self.summaries {
            writeln!(f, "\n{} (n={}):", s.name, s.count)?;
            writeln!(f, "  Mean:   {:.2} ms", s.mean)?;
            writeln!(f, "  Median: {:.2} ms", s.median)?;
            writeln!(f, "  Std Dev:{:.2} ms", s.stdev)?;
            writeln!(f, "  P95:    {:.2} ms", s.p95)?;
            writeln!(f, "  Range:  {} - {} ms", s.min, s.max)?;
        }

        writeln!(f, "\n{}", rule)?;
        writeln!(f, "SPEEDUP FACTORS")?;
        writeln!(f, "{}", rule)?;
        for s in &self.speedups {
            writeln!(
                f,
                "{} Speedup: {:.2}x (Legacy/Turbo)",
                s.metric.name(),
                s.factor
            )?;
        }

        writeln!(f, "\n{}", rule)?;
        writeln!(f, "COEFFICIENT OF VARIATION (Stability)")?;
        writeln!(f, "{}", rule)?;
        for v in &self.variation {
            writeln!(f, "{:<22}{:.2}%", format!("{} CV:", v.name), v.cv_percent)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_report_numbers() {
        let report = Report::build(&SampleSet::recorded()).unwrap();
        assert_eq!(report.summaries.len(), 4);

        let cold = report.summary(SeriesId::LEGACY_COLD).unwrap();
        assert!((cold.mean - 1285.3).abs() < 1e-9);
        assert_eq!(cold.median, 1271.5);
        assert!((cold.p95 - 1435.75).abs() < 1e-9);

        assert!((report.speedup(Metric::ColdStart).unwrap() - 2.2578).abs() < 1e-4);
        assert!((report.speedup(Metric::Hmr).unwrap() - 6.1765).abs() < 1e-4);
    }

    #[test]
    fn text_layout() {
        let text = Report::build(&SampleSet::recorded()).unwrap().to_string();

        assert!(text.starts_with(&"=".repeat(60)));
        assert!(text.contains("STATISTICAL ANALYSIS RESULTS (N=30)"));
        assert!(text.contains(
            "Legacy Cold Start (n=30):\n  Mean:   1285.30 ms\n  Median: 1271.50 ms\n  Std Dev:70.90 ms\n  P95:    1435.75 ms\n  Range:  1196 - 1511 ms\n"
        ));
        assert!(text.contains("Cold Start Speedup: 2.26x (Legacy/Turbo)"));
        assert!(text.contains("HMR Speedup: 6.18x (Legacy/Turbo)"));
        assert!(text.contains("Legacy Cold Start CV: 5.52%"));
        assert!(text.contains("Turbo Cold Start CV:  2.15%"));
        assert!(text.contains("Legacy HMR CV:        3.42%"));
        assert!(text.contains("Turbo HMR CV:         10.82%"));
    }

    #[test]
    fn header_omits_count_when_sizes_differ() {
        let set = SampleSet::recorded().with_override(SeriesId::TURBO_HMR, vec![25.0, 26.0]);
        let text = Report::build(&set).unwrap().to_string();
        assert!(text.contains("STATISTICAL ANALYSIS RESULTS\n"));
        assert!(text.contains("Turbo HMR (n=2):"));
    }

    #[test]
    fn build_propagates_sample_errors() {
        let set = SampleSet::recorded().with_override(SeriesId::LEGACY_HMR, vec![163.0]);
        assert!(matches!(
            Report::build(&set),
            Err(stats::StatsError::InsufficientSample { actual: 1, .. })
        ));
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::WriteZero, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_text_reports_write_errors() {
        let report = Report::build(&SampleSet::recorded()).unwrap();

        let err = report.write_text(&mut FullDisk).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);

        let mut buf = Vec::new();
        report.write_text(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), report.to_string());
    }

    #[test]
    fn json_export() {
        let report = Report::build(&SampleSet::recorded()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["summaries"][0]["name"], "Legacy Cold Start");
        assert_eq!(value["summaries"][0]["count"], 30);
        assert_eq!(value["speedups"][1]["metric"], "hmr");
    }
}
