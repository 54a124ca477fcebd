//! Execution summary extraction.
//!
//! A benchmark log may record several timed runs (warm-up followed by the
//! measured run). Only the last summary line in the file is authoritative.

use crate::error::{Error, Result};
use crate::input::read_log_lossy;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

// ASCII digits only; a field in another script does not make a summary line.
#[allow(clippy::expect_used)]
static EXECUTION_LINE: Lazy<Regex> = Lazy::new(|| {
	Regex::new(concat!(
		r"runs=(?P<runs>[0-9]+),\s*",
		r"totalMillis=(?P<total>[0-9]+),\s*",
		r"averageMillis=(?P<avg>[0-9]+),\s*",
		r"resultCount=(?P<results>[0-9]+),\s*",
		r"softLimitMillis=(?P<soft_limit>[0-9]+),\s*",
		r"softLimitReached=(?P<soft_reached>true|false),\s*",
		r"maxRunsReached=(?P<max_reached>true|false)",
	))
	.expect("execution summary pattern")
});

/// Aggregate timing and result-count statistics of one benchmark run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionMetrics {
	pub runs: u64,
	#[serde(rename = "total_millis")]
	pub total: u64,
	#[serde(rename = "average_millis")]
	pub avg: u64,
	#[serde(rename = "result_count")]
	pub results: u64,
}

/// Extract the metrics of the last execution summary line in `text`.
///
/// `source` only labels errors.
pub fn parse_execution_metrics(text: &str, source: &Path) -> Result<ExecutionMetrics> {
	let mut count = 0usize;
	let last = EXECUTION_LINE.captures_iter(text).inspect(|_| count += 1).last();
	let Some(caps) = last else {
		return Err(Error::MissingMetrics { path: source.to_path_buf() });
	};
	debug!(path = %source.display(), matches = count, "execution summary lines");

	Ok(ExecutionMetrics {
		runs: field(&caps, "runs", source)?,
		total: field(&caps, "total", source)?,
		avg: field(&caps, "avg", source)?,
		results: field(&caps, "results", source)?,
	})
}

/// Read `path` and extract its authoritative execution metrics.
pub fn load_execution_metrics(path: &Path) -> Result<ExecutionMetrics> {
	let text = read_log_lossy(path)?;
	parse_execution_metrics(&text, path)
}

fn field(caps: &Captures<'_>, name: &'static str, source: &Path) -> Result<u64> {
	let raw = caps.name(name).map(|m| m.as_str()).unwrap_or_default();
	raw.parse::<u64>().map_err(|_| Error::InvalidMetric {
		path: source.to_path_buf(),
		field: name,
		value: raw.to_string(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn src() -> &'static Path { Path::new("baseline.log") }

	#[test]
	fn last_line_wins() {
		let log = "\
warmup runs=1, totalMillis=900, averageMillis=900, resultCount=20, softLimitMillis=1000, softLimitReached=false, maxRunsReached=false
INFO measured runs=5, totalMillis=500, averageMillis=100, resultCount=20, softLimitMillis=1000, softLimitReached=true, maxRunsReached=false
";
		let m = parse_execution_metrics(log, src()).unwrap();
		assert_eq!(m, ExecutionMetrics { runs: 5, total: 500, avg: 100, results: 20 });
	}

	#[test]
	fn whitespace_after_commas_is_optional() {
		let log = "runs=3,totalMillis=30,averageMillis=10,   resultCount=7,softLimitMillis=0,softLimitReached=false,maxRunsReached=true";
		let m = parse_execution_metrics(log, src()).unwrap();
		assert_eq!((m.runs, m.total, m.avg, m.results), (3, 30, 10, 7));
	}

	#[test]
	fn incomplete_line_does_not_match() {
		let log = "runs=3, totalMillis=30, averageMillis=10, resultCount=7, softLimitMillis=0, softLimitReached=maybe, maxRunsReached=false";
		match parse_execution_metrics(log, src()) {
			Err(Error::MissingMetrics { path }) => assert_eq!(path, src()),
			other => panic!("unexpected: {other:?}"),
		}
	}

	#[test]
	fn empty_log_is_missing_metrics() {
		let err = parse_execution_metrics("", src()).unwrap_err();
		assert!(err.to_string().contains("baseline.log"));
	}

	#[test]
	fn load_reads_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("candidate.log");
		std::fs::write(&path, "runs=2, totalMillis=260, averageMillis=130, resultCount=20, softLimitMillis=1000, softLimitReached=false, maxRunsReached=true\n").unwrap();
		assert_eq!(load_execution_metrics(&path).unwrap().avg, 130);
		assert!(matches!(load_execution_metrics(&dir.path().join("gone.log")), Err(Error::FileAccess { .. })));
	}

	#[test]
	fn non_ascii_digits_do_not_match() {
		let arabic = "runs=\u{663}, totalMillis=30, averageMillis=10, resultCount=7, softLimitMillis=0, softLimitReached=false, maxRunsReached=false";
		assert!(matches!(parse_execution_metrics(arabic, src()), Err(Error::MissingMetrics { .. })));

		let log = format!("runs=2, totalMillis=40, averageMillis=20, resultCount=7, softLimitMillis=0, softLimitReached=false, maxRunsReached=false\n{arabic}");
		let m = parse_execution_metrics(&log, src()).unwrap();
		assert_eq!((m.runs, m.avg), (2, 20));
	}

	#[test]
	fn overflowing_field_is_rejected() {
		let log = "runs=1, totalMillis=99999999999999999999999, averageMillis=1, resultCount=1, softLimitMillis=1, softLimitReached=false, maxRunsReached=false";
		match parse_execution_metrics(log, src()) {
			Err(Error::InvalidMetric { field, .. }) => assert_eq!(field, "total"),
			other => panic!("unexpected: {other:?}"),
		}
	}
}
