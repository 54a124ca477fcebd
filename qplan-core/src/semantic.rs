//! Per-stage plan diff rows from the optional comparison log.

use crate::error::Result;
use crate::input::read_log_lossy;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path};
use tracing::{debug, warn};

/// Token marking a changed dimension in a diff row.
pub const DIFF_MARKER: &str = "diff";

#[allow(clippy::expect_used)]
static DIFF_LINE: Lazy<Regex> = Lazy::new(|| {
	Regex::new(concat!(
		r"^\s*(?P<level>unoptimized|optimized|executed):\s+",
		r".*structure=(?P<structure>[^,]+),\s*",
		r"joinAlgorithms=(?P<joins>[^,]+),\s*",
		r"actualResultSizes=(?P<actual>[^,]+),\s*",
		r"estimates=(?P<estimates>[^,\s]+)",
	))
	.expect("semantic diff pattern")
});

// CR, LF, CRLF plus VT, FF, FS, GS, RS, NEL, LS and PS.
#[allow(clippy::expect_used)]
static LINE_BREAK: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"\r\n|[\n\r\x0b\x0c\x1c-\x1e\x{85}\x{2028}\x{2029}]").expect("line break pattern"));

/// Optimization stage a diff row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanLevel {
	Unoptimized,
	Optimized,
	Executed,
}

impl PlanLevel {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Unoptimized => "unoptimized",
			Self::Optimized => "optimized",
			Self::Executed => "executed",
		}
	}

	fn from_token(token: &str) -> Option<Self> {
		match token {
			"unoptimized" => Some(Self::Unoptimized),
			"optimized" => Some(Self::Optimized),
			"executed" => Some(Self::Executed),
			_ => None,
		}
	}
}

impl fmt::Display for PlanLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// One `<level>: ... structure=.., joinAlgorithms=.., actualResultSizes=.., estimates=..` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticDiffRow {
	pub level: PlanLevel,
	pub structure: String,
	#[serde(rename = "join_algorithms")]
	pub joins: String,
	#[serde(rename = "actual_result_sizes")]
	pub actual: String,
	pub estimates: String,
}

/// Collect diff rows in file order; other lines are skipped.
pub fn parse_semantic_diff(text: &str) -> Vec<SemanticDiffRow> {
	LINE_BREAK
		.split(text)
		.filter_map(|line| {
			let caps = DIFF_LINE.captures(line)?;
			let token = |name: &str| caps.name(name).map(|m| m.as_str().trim().to_string()).unwrap_or_default();
			Some(SemanticDiffRow {
				level: PlanLevel::from_token(caps.name("level")?.as_str())?,
				structure: token("structure"),
				joins: token("joins"),
				actual: token("actual"),
				estimates: token("estimates"),
			})
		})
		.collect()
}

/// Parse the already-read comparison log at `path`, logging how many rows it held.
pub fn rows_from_log(text: &str, path: &Path) -> Vec<SemanticDiffRow> {
	let rows = parse_semantic_diff(text);
	if rows.is_empty() {
		warn!(path = %path.display(), "comparison log contains no semantic diff rows");
	} else {
		debug!(path = %path.display(), rows = rows.len(), "semantic diff rows");
	}
	rows
}

/// Read diff rows from `path`. No path means no rows.
pub fn load_semantic_diff(path: Option<&Path>) -> Result<Vec<SemanticDiffRow>> {
	let Some(path) = path else { return Ok(Vec::new()) };
	Ok(rows_from_log(&read_log_lossy(path)?, path))
}

/// Which plan dimensions changed in any row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanChanges {
	pub structure: bool,
	pub joins: bool,
	pub actual: bool,
	pub estimates: bool,
}

impl PlanChanges {
	pub fn from_rows(rows: &[SemanticDiffRow]) -> Self {
		let any = |get: fn(&SemanticDiffRow) -> &str| rows.iter().any(|r| get(r) == DIFF_MARKER);
		Self {
			structure: any(|r| r.structure.as_str()),
			joins: any(|r| r.joins.as_str()),
			actual: any(|r| r.actual.as_str()),
			estimates: any(|r| r.estimates.as_str()),
		}
	}

	/// Structure, join choice or actual result sizes differ.
	pub fn shape_changed(&self) -> bool { self.structure || self.joins || self.actual }

	/// Structure or join choice differ; the optimizer picked another plan.
	pub fn optimizer_changed(&self) -> bool { self.structure || self.joins }

	pub fn any(&self) -> bool { self.shape_changed() || self.estimates }
}
