//! Loading samples recorded outside the binary.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::data::{Metric, SampleSet, SeriesId};
use crate::logs;

/// Sample file layout. Every key is optional; missing series keep their
/// recorded values.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SampleFile {
    #[serde(default)]
    pub legacy_cold: Option<Vec<f64>>,
    #[serde(default)]
    pub turbo_cold: Option<Vec<f64>>,
    #[serde(default)]
    pub legacy_hmr: Option<Vec<f64>>,
    #[serde(default)]
    pub turbo_hmr: Option<Vec<f64>>,
}

impl SampleFile {
    /// Apply every series present in the file on top of `base`.
    pub fn apply(self, base: SampleSet) -> SampleSet {
        [
            (SeriesId::LEGACY_COLD, self.legacy_cold),
            (SeriesId::TURBO_COLD, self.turbo_cold),
            (SeriesId::LEGACY_HMR, self.legacy_hmr),
            (SeriesId::TURBO_HMR, self.turbo_hmr),
        ]
        .into_iter()
        .fold(base, |set, (series, values)| match values {
            Some(values) => set.with_override(series, values),
            None => set,
        })
    }
}

/// Load a JSON sample file, e.g. `{"legacy_hmr": [149, 162, 163]}`.
pub fn load_sample_file(path: &Path) -> Result<SampleFile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read sample file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse sample file {}", path.display()))
}

/// Extract one sample from a captured dev-server log.
pub fn load_log_sample(path: &Path, metric: Metric) -> Result<Vec<f64>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read log file {}", path.display()))?;
    let latencies = logs::extract_latencies(&contents, metric);
    if latencies.is_empty() {
        anyhow::bail!(
            "No {} latencies found in {}",
            metric.name(),
            path.display()
        );
    }
    Ok(latencies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn sample_file_overrides_listed_series() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, r#"{{"turbo_hmr": [20, 21.5, 22]}}"#)?;

        let set = load_sample_file(file.path())?.apply(SampleSet::recorded());
        assert_eq!(set.get(SeriesId::TURBO_HMR).values(), &[20.0, 21.5, 22.0]);
        assert_eq!(set.get(SeriesId::LEGACY_COLD).len(), 30);
        Ok(())
    }

    #[test]
    fn sample_file_rejects_unknown_series() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, r#"{{"legacy_warm": [1, 2]}}"#)?;
        assert!(load_sample_file(file.path()).is_err());
        Ok(())
    }

    #[test]
    fn log_without_matches_is_an_error() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, " ✓ Starting...")?;
        let err = load_log_sample(file.path(), Metric::ColdStart).unwrap_err();
        assert!(err.to_string().contains("No Cold Start latencies"));
        Ok(())
    }

    #[test]
    fn log_sample() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, " ✓ Ready in 1438ms")?;
        writeln!(file, " ✓ Ready in 1275ms")?;
        assert_eq!(
            load_log_sample(file.path(), Metric::ColdStart)?,
            vec![1438.0, 1275.0]
        );
        Ok(())
    }
}
