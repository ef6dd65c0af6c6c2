use std::path::Path;

use tracing::warn;

use crate::math::stats;
use crate::metrics::{DvarsSummary, FdSummary, SeriesSummary};

/// Framewise displacement above this many millimetres counts as an outlier.
pub const FD_THRESHOLD_MM: f64 = 0.5;

#[derive(Debug, Clone, Default)]
pub struct SeriesLoad {
    pub values: Vec<f64>,
    pub warnings: Vec<String>,
}

/// Reads one value per non-empty line, taking the first whitespace token.
/// A missing or unreadable file yields an empty series.
pub fn load_series(path: &Path) -> SeriesLoad {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "series file unavailable");
            return SeriesLoad {
                values: Vec::new(),
                warnings: vec![format!("{} unavailable: {}", path.display(), err)],
            };
        }
    };
    parse_series(&text, path)
}

pub fn parse_series(text: &str, source: &Path) -> SeriesLoad {
    let mut load = SeriesLoad::default();
    for (i, line) in text.lines().enumerate() {
        let Some(token) = line.split_whitespace().next() else {
            continue;
        };
        match token.parse::<f64>() {
            Ok(v) => load.values.push(v),
            Err(_) => load.warnings.push(format!(
                "{}: skipped unparsable line {} ('{}')",
                source.display(),
                i + 1,
                token
            )),
        }
    }
    load
}

pub fn summarize_series(values: &[f64], threshold: f64) -> SeriesSummary {
    SeriesSummary {
        n: values.len(),
        mean: stats::mean(values),
        max: stats::max(values),
        count_above: stats::count_above(values, threshold),
    }
}

/// Number of lines in a file, 0 when it is missing or unreadable.
pub fn count_lines(path: &Path) -> usize {
    std::fs::read_to_string(path)
        .map(|text| text.lines().count())
        .unwrap_or(0)
}

pub fn aggregate_fd(series_path: &Path) -> (FdSummary, Vec<String>) {
    let load = load_series(series_path);
    let summary = FdSummary {
        series: summarize_series(&load.values, FD_THRESHOLD_MM),
        threshold_mm: FD_THRESHOLD_MM,
    };
    (summary, load.warnings)
}

pub fn aggregate_dvars(series_path: &Path, flags_path: &Path) -> (DvarsSummary, Vec<String>) {
    let load = load_series(series_path);
    let summary = DvarsSummary {
        series: summarize_series(&load.values, f64::INFINITY),
        outlier_count: count_lines(flags_path),
    };
    (summary, load.warnings)
}
