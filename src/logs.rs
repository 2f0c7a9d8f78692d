//! Latency extraction from recorded dev-server output.
//!
//! Cold start runs end with a line such as `✓ Ready in 1438ms` (or
//! `Ready in 15.8s` on slow starts). An HMR run starts the same way, then
//! the first page fetch compiles `/` (the warm-up), and only the next
//! `✓ Compiled ... in 163ms` is the rebuild of the edited module. Output of
//! the measurement harness carries the result directly as
//! `-> HMR Detected: 163 ms`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::data::Metric;

static READY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bReady in ([0-9]+(?:\.[0-9]+)?)\s*(ms|s)\b").expect("valid regex")
});

static COMPILED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bCompiled\b.*\bin ([0-9]+(?:\.[0-9]+)?)\s*(ms|s)\b").expect("valid regex")
});

static HMR_DETECTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bHMR Detected:\s*([0-9]+(?:\.[0-9]+)?)\s*(ms|s)\b").expect("valid regex")
});

/// Where an HMR run is between its `Ready in` line and the measured rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HmrRun {
    NotStarted,
    WarmingUp,
    AwaitingRebuild,
    Measured,
}

fn to_millis(caps: &Captures<'_>) -> Option<f64> {
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    match caps.get(2)?.as_str().to_ascii_lowercase().as_str() {
        "s" => Some(value * 1000.0),
        _ => Some(value),
    }
}

/// Latency in milliseconds reported on `line`, if it is a line the dev
/// server prints at the end of a `metric` measurement.
pub fn extract_latency(line: &str, metric: Metric) -> Option<f64> {
    let pattern = match metric {
        Metric::ColdStart => &READY,
        Metric::Hmr => &COMPILED,
    };
    pattern.captures(line).and_then(|caps| to_millis(&caps))
}

/// Every `metric` latency found in `text`, in the order they appear.
///
/// For HMR each `Ready in` line opens a run whose first compile is the
/// warm-up and is skipped; the compile after it is the sample, and further
/// compiles are ignored until the next run. When the text holds
/// `HMR Detected` lines, only those are counted.
pub fn extract_latencies(text: &str, metric: Metric) -> Vec<f64> {
    let latencies = match metric {
        Metric::ColdStart => text
            .lines()
            .filter_map(|line| extract_latency(line, metric))
            .collect(),
        Metric::Hmr => {
            let detected = detected_hmr(text);
            if detected.is_empty() {
                hmr_rebuilds(text)
            } else {
                detected
            }
        }
    };
    tracing::debug!(
        "extracted {} {} latencies from {} lines",
        latencies.len(),
        metric.name(),
        text.lines().count()
    );
    latencies
}

fn detected_hmr(text: &str) -> Vec<f64> {
    text.lines()
        .filter_map(|line| HMR_DETECTED.captures(line))
        .filter_map(|caps| to_millis(&caps))
        .collect()
}

fn hmr_rebuilds(text: &str) -> Vec<f64> {
    let mut run = HmrRun::NotStarted;
    let mut latencies = Vec::new();

    for line in text.lines() {
        if READY.is_match(line) {
            if run == HmrRun::WarmingUp || run == HmrRun::AwaitingRebuild {
                tracing::debug!("HMR run ended without a rebuild");
            }
            run = HmrRun::WarmingUp;
            continue;
        }
        let Some(latency) = extract_latency(line, Metric::Hmr) else {
            continue;
        };
        run = match run {
            HmrRun::WarmingUp => {
                tracing::debug!("skipping warm-up compile of {} ms", latency);
                HmrRun::AwaitingRebuild
            }
            HmrRun::AwaitingRebuild => {
                latencies.push(latency);
                HmrRun::Measured
            }
            other => other,
        };
    }

    latencies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_in_milliseconds_and_seconds() {
        assert_eq!(
            extract_latency(" ✓ Ready in 1438ms", Metric::ColdStart),
            Some(1438.0)
        );
        assert_eq!(
            extract_latency("  ✓ Ready in 15.8s", Metric::ColdStart),
            Some(15800.0)
        );
        assert_eq!(
            extract_latency("ready in 640 ms", Metric::ColdStart),
            Some(640.0)
        );
    }

    #[test]
    fn compiled_lines() {
        assert_eq!(
            extract_latency(" ✓ Compiled /page in 163ms (512 modules)", Metric::Hmr),
            Some(163.0)
        );
        assert_eq!(
            extract_latency("✓ Compiled in 26ms", Metric::Hmr),
            Some(26.0)
        );
        assert_eq!(
            extract_latency("Compiled /_not-found in 1.2s", Metric::Hmr),
            Some(1200.0)
        );
    }

    #[test]
    fn metrics_do_not_cross_match() {
        assert_eq!(extract_latency("✓ Ready in 1438ms", Metric::Hmr), None);
        assert_eq!(
            extract_latency("✓ Compiled in 26ms", Metric::ColdStart),
            None
        );
        assert_eq!(extract_latency("○ Compiling /page ...", Metric::Hmr), None);
    }

    #[test]
    fn cold_start_takes_every_ready_line() {
        let log = "\
> next dev
  ▲ Next.js 14.2.3
 ✓ Starting...
 ✓ Ready in 1275ms
 ○ Compiling / ...
 ✓ Compiled / in 2.1s (498 modules)
 ✓ Ready in 1.3s
";
        assert_eq!(
            extract_latencies(log, Metric::ColdStart),
            vec![1275.0, 1300.0]
        );
    }

    #[test]
    fn hmr_skips_warm_up_compile() {
        let log = "\
 ✓ Ready in 1275ms
 ○ Compiling / ...
 ✓ Compiled / in 2.1s (498 modules)
 ✓ Compiled in 163ms (512 modules)
";
        assert_eq!(extract_latencies(log, Metric::Hmr), vec![163.0]);
    }

    #[test]
    fn hmr_one_sample_per_run() {
        let log = "\
 ✓ Ready in 1275ms
 ✓ Compiled / in 2.1s (498 modules)
 ✓ Compiled in 163ms (512 modules)
 ✓ Compiled /favicon.ico in 40ms
 ✓ Ready in 1.3s
 ✓ Compiled / in 1.9s (498 modules)
 ✓ Compiled /page in 158ms
";
        assert_eq!(extract_latencies(log, Metric::Hmr), vec![163.0, 158.0]);
    }

    #[test]
    fn hmr_ignores_compiles_outside_a_run() {
        // No rebuild after the warm-up, and nothing before the first Ready.
        let log = "\
 ✓ Compiled in 12ms
 ✓ Ready in 1275ms
 ✓ Compiled / in 2.1s (498 modules)
";
        assert!(extract_latencies(log, Metric::Hmr).is_empty());
    }

    #[test]
    fn hmr_prefers_harness_results() {
        let log = "\
 -> Server Ready. Warming up (fetching page)...
 -> Page fetched. Waiting for stability...
 -> Triggering File Change...
 -> HMR Detected: 26 ms
 -> HMR Detected: 28 ms
";
        assert_eq!(extract_latencies(log, Metric::Hmr), vec![26.0, 28.0]);
    }
}
