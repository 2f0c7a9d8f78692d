//! Recorded benchmark samples and the series they belong to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::stats::{self, StatsSummary};

/// Dev-server toolchain a sample was recorded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Toolchain {
    Legacy,
    Turbo,
}

/// Which latency a sample measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Time from launch until the server reports ready.
    ColdStart,
    /// Time to recompile after an edit (hot module replacement).
    Hmr,
}

impl Toolchain {
    pub fn name(&self) -> &'static str {
        match self {
            Toolchain::Legacy => "Legacy",
            Toolchain::Turbo => "Turbo",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Toolchain::Legacy => "legacy",
            Toolchain::Turbo => "turbo",
        }
    }
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Metric::ColdStart => "Cold Start",
            Metric::Hmr => "HMR",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Metric::ColdStart => "cold",
            Metric::Hmr => "hmr",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesId {
    pub toolchain: Toolchain,
    pub metric: Metric,
}

impl SeriesId {
    pub const LEGACY_COLD: SeriesId = SeriesId::new(Toolchain::Legacy, Metric::ColdStart);
    pub const TURBO_COLD: SeriesId = SeriesId::new(Toolchain::Turbo, Metric::ColdStart);
    pub const LEGACY_HMR: SeriesId = SeriesId::new(Toolchain::Legacy, Metric::Hmr);
    pub const TURBO_HMR: SeriesId = SeriesId::new(Toolchain::Turbo, Metric::Hmr);

    /// Report order.
    pub const ALL: [SeriesId; 4] = [
        SeriesId::LEGACY_COLD,
        SeriesId::TURBO_COLD,
        SeriesId::LEGACY_HMR,
        SeriesId::TURBO_HMR,
    ];

    pub const fn new(toolchain: Toolchain, metric: Metric) -> Self {
        Self { toolchain, metric }
    }

    /// Human readable label, e.g. "Legacy Cold Start".
    pub fn label(&self) -> String {
        format!("{} {}", self.toolchain.name(), self.metric.name())
    }

    /// Short key used on the command line and in sample files, e.g. `legacy_cold`.
    pub fn key(&self) -> String {
        format!("{}_{}", self.toolchain.key(), self.metric.key())
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for SeriesId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeriesId::ALL
            .into_iter()
            .find(|id| id.key() == s)
            .ok_or_else(|| {
                let keys: Vec<String> = SeriesId::ALL.iter().map(SeriesId::key).collect();
                format!("unknown series '{}'. Available: {}", s, keys.join(", "))
            })
    }
}

/// An immutable sequence of latency measurements in milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    series: SeriesId,
    values: Vec<f64>,
}

impl Sample {
    pub fn new(series: SeriesId, values: Vec<f64>) -> Self {
        Self { series, values }
    }

    pub fn series(&self) -> SeriesId {
        self.series
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn summarize(&self) -> stats::Result<StatsSummary> {
        stats::summarize(self.series.label(), &self.values)
    }
}

/// One sample for each of the four series.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    samples: [Sample; 4],
}

impl SampleSet {
    /// The samples recorded on the reference machine (N=30 runs each).
    pub fn recorded() -> Self {
        Self {
            samples: [
                Sample::new(SeriesId::LEGACY_COLD, LEGACY_COLD.to_vec()),
                Sample::new(SeriesId::TURBO_COLD, TURBO_COLD.to_vec()),
                Sample::new(SeriesId::LEGACY_HMR, LEGACY_HMR.to_vec()),
                Sample::new(SeriesId::TURBO_HMR, TURBO_HMR.to_vec()),
            ],
        }
    }

    fn index(series: SeriesId) -> usize {
        SeriesId::ALL
            .iter()
            .position(|id| *id == series)
            .unwrap_or_default()
    }

    pub fn get(&self, series: SeriesId) -> &Sample {
        &self.samples[Self::index(series)]
    }

    /// Replace one series, keeping the others.
    pub fn with_override(mut self, series: SeriesId, values: Vec<f64>) -> Self {
        self.samples[Self::index(series)] = Sample::new(series, values);
        self
    }

    /// Samples in report order.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }
}

impl Default for SampleSet {
    fn default() -> Self {
        Self::recorded()
    }
}

pub const LEGACY_HMR: [f64; 30] = [
    149.0, 162.0, 163.0, 163.0, 167.0, 162.0, 164.0, 165.0, 167.0, 149.0, 163.0, 164.0, 169.0,
    162.0, 163.0, 164.0, 163.0, 165.0, 164.0, 168.0, 156.0, 153.0, 166.0, 168.0, 177.0, 163.0,
    167.0, 166.0, 163.0, 163.0,
];

pub const TURBO_HMR: [f64; 30] = [
    28.0, 41.0, 26.0, 26.0, 25.0, 25.0, 26.0, 26.0, 26.0, 27.0, 27.0, 26.0, 26.0, 25.0, 26.0,
    25.0, 26.0, 25.0, 26.0, 26.0, 25.0, 27.0, 27.0, 25.0, 26.0, 27.0, 26.0, 25.0, 26.0, 25.0,
];

pub const LEGACY_COLD: [f64; 30] = [
    1438.0, 1275.0, 1265.0, 1289.0, 1300.0, 1242.0, 1342.0, 1284.0, 1237.0, 1294.0, 1433.0,
    1266.0, 1377.0, 1224.0, 1279.0, 1196.0, 1511.0, 1234.0, 1282.0, 1226.0, 1268.0, 1253.0,
    1280.0, 1290.0, 1215.0, 1278.0, 1208.0, 1259.0, 1263.0, 1251.0,
];

pub const TURBO_COLD: [f64; 30] = [
    622.0, 567.0, 564.0, 570.0, 563.0, 566.0, 566.0, 565.0, 566.0, 563.0, 567.0, 604.0, 567.0,
    566.0, 565.0, 567.0, 564.0, 571.0, 565.0, 568.0, 569.0, 566.0, 567.0, 564.0, 569.0, 565.0,
    565.0, 565.0, 566.0, 566.0,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_keys_round_trip() {
        for id in SeriesId::ALL {
            assert_eq!(id.key().parse::<SeriesId>(), Ok(id));
        }
        assert!("legacy_warm".parse::<SeriesId>().is_err());
    }

    #[test]
    fn labels() {
        assert_eq!(SeriesId::LEGACY_COLD.label(), "Legacy Cold Start");
        assert_eq!(SeriesId::TURBO_HMR.label(), "Turbo HMR");
        assert_eq!(SeriesId::TURBO_COLD.to_string(), "turbo_cold");
    }

    #[test]
    fn recorded_samples_have_thirty_runs() {
        let set = SampleSet::recorded();
        let series: Vec<SeriesId> = set.iter().map(Sample::series).collect();
        assert_eq!(series, SeriesId::ALL.to_vec());
        assert!(set.iter().all(|s| s.len() == 30));
    }

    #[test]
    fn override_replaces_only_one_series() {
        let set = SampleSet::recorded().with_override(SeriesId::TURBO_HMR, vec![1.0, 2.0]);
        assert_eq!(set.get(SeriesId::TURBO_HMR).values(), &[1.0, 2.0]);
        assert_eq!(set.get(SeriesId::LEGACY_HMR).values(), &LEGACY_HMR);
    }
}
