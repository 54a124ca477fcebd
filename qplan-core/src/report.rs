//! Summary assembly and rendering.
//!
//! The text layout is stable: labels and field order are grepped by
//! downstream tooling.

use crate::delta::{self, RuntimeSignal};
use crate::error::Result;
use crate::metrics::ExecutionMetrics;
use crate::semantic::{PlanChanges, SemanticDiffRow};
use crate::verdict::{self, Verdict};
use serde::{Deserialize, Serialize};
use std::{fmt, io, str::FromStr};
use tracing::{debug, info};

/// Title line of the text report.
pub const REPORT_TITLE: &str = "QueryPlanSnapshotCli regression summary";

/// Report rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
	#[default]
	Text,
	Json,
}

impl OutputFormat {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Text => "text",
			Self::Json => "json",
		}
	}
}

impl FromStr for OutputFormat {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"text" => Ok(Self::Text),
			"json" => Ok(Self::Json),
			other => Err(format!("unknown output format: {other} (expected text or json)")),
		}
	}
}

impl fmt::Display for OutputFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Everything one comparison produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
	pub baseline: ExecutionMetrics,
	pub candidate: ExecutionMetrics,
	/// `None` when the baseline average is zero.
	pub delta_percent: Option<f64>,
	pub runtime_signal: RuntimeSignal,
	pub result_count_changed: bool,
	pub plan_changes: PlanChanges,
	pub semantic_diff: Vec<SemanticDiffRow>,
	pub verdict: Verdict,
}

impl Summary {
	pub fn build(baseline: ExecutionMetrics, candidate: ExecutionMetrics, semantic_diff: Vec<SemanticDiffRow>) -> Self {
		let delta_percent = delta::delta_percent(baseline.avg, candidate.avg);
		let runtime_signal = delta::classify(delta_percent);
		let plan_changes = PlanChanges::from_rows(&semantic_diff);
		let verdict = verdict::synthesize(&baseline, &candidate, runtime_signal, &plan_changes);
		debug!(?delta_percent, signal = %runtime_signal, ?plan_changes, "runtime delta");
		info!(%verdict, "verdict");

		Self {
			baseline,
			candidate,
			delta_percent,
			runtime_signal,
			result_count_changed: baseline.results != candidate.results,
			plan_changes,
			semantic_diff,
			verdict,
		}
	}
}

/// Text rendering of a [`Summary`].
pub struct TextReport<'a>(pub &'a Summary);

impl fmt::Display for TextReport<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = self.0;
		writeln!(f, "{REPORT_TITLE}")?;
		writeln!(f, "- baseline avgMillis: {}", s.baseline.avg)?;
		writeln!(f, "- candidate avgMillis: {}", s.candidate.avg)?;
		match s.delta_percent {
			Some(d) => writeln!(f, "- delta: {d:+.2}%")?,
			None => writeln!(f, "- delta: n/a (baseline averageMillis=0)")?,
		}
		writeln!(f, "- baseline resultCount: {}", s.baseline.results)?;
		writeln!(f, "- candidate resultCount: {}", s.candidate.results)?;
		writeln!(f, "- runtime signal: {}", s.runtime_signal)?;

		if s.semantic_diff.is_empty() {
			writeln!(f, "- semantic diff: not provided")?;
		} else {
			writeln!(f, "- semantic diff:")?;
			for row in &s.semantic_diff {
				writeln!(
					f,
					"  {}: structure={}, joinAlgorithms={}, actualResultSizes={}, estimates={}",
					row.level, row.structure, row.joins, row.actual, row.estimates
				)?;
			}
		}

		writeln!(f, "- verdict: {}", s.verdict)
	}
}

pub fn render_text(summary: &Summary) -> String { TextReport(summary).to_string() }

/// Emit `summary` to `out` in the requested format.
pub fn write_report<W: io::Write>(mut out: W, summary: &Summary, format: OutputFormat) -> Result<()> {
	match format {
		OutputFormat::Text => write!(out, "{}", TextReport(summary))?,
		OutputFormat::Json => {
			serde_json::to_writer_pretty(&mut out, summary)?;
			writeln!(out)?;
		}
	}
	out.flush()?;
	Ok(())
}
