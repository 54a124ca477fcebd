#![forbid(unsafe_code)]

//! Query-plan regression summary.
//!
//! Compares the last execution summary of a baseline and a candidate log,
//! classifies the latency delta and cross-references it with optional
//! per-stage plan diff rows to produce a verdict.

use crate::input::read_log_lossy;
use std::path::PathBuf;
use tracing::debug;

pub mod config;
pub mod delta;
pub mod error;
pub mod input;
pub mod metrics;
pub mod report;
pub mod semantic;
pub mod verdict;

pub use config::ToolConfig;
pub use delta::RuntimeSignal;
pub use error::{Error, Result};
pub use metrics::ExecutionMetrics;
pub use report::{OutputFormat, Summary};
pub use semantic::{PlanChanges, PlanLevel, SemanticDiffRow};
pub use verdict::Verdict;

/// Log files for one comparison.
#[derive(Debug, Clone)]
pub struct AnalysisInput {
	pub baseline_log: PathBuf,
	pub candidate_log: PathBuf,
	pub comparison_log: Option<PathBuf>,
}

/// Read every supplied log, then run extraction, classification and verdict synthesis.
pub fn analyze(logs: &AnalysisInput) -> Result<Summary> {
	let baseline_text = read_log_lossy(&logs.baseline_log)?;
	let candidate_text = read_log_lossy(&logs.candidate_log)?;
	let comparison_text = logs.comparison_log.as_deref().map(read_log_lossy).transpose()?;
	debug!(comparison = comparison_text.is_some(), "logs loaded");

	let baseline = metrics::parse_execution_metrics(&baseline_text, &logs.baseline_log)?;
	let candidate = metrics::parse_execution_metrics(&candidate_text, &logs.candidate_log)?;
	let rows = match (comparison_text.as_deref(), logs.comparison_log.as_deref()) {
		(Some(text), Some(path)) => semantic::rows_from_log(text, path),
		_ => Vec::new(),
	};

	Ok(Summary::build(baseline, candidate, rows))
}
