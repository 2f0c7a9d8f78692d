//! Descriptive statistics and comparison charts for dev-server toolchain
//! benchmarks (legacy vs. turbo bundler, cold start and HMR latency).

pub mod charts;
pub mod data;
pub mod input;
pub mod logs;
pub mod report;
pub mod stats;

pub use data::{Metric, Sample, SampleSet, SeriesId, Toolchain};
pub use report::Report;
pub use stats::{StatsError, StatsSummary};
