//! Relative latency delta and its runtime signal.
//!
//! Deltas strictly between the two thresholds are treated as benchmark noise.

use serde::{Deserialize, Serialize};
use std::fmt;

/// At or below this delta (percent) the candidate counts as faster.
pub const IMPROVEMENT_THRESHOLD_PCT: f64 = -10.0;
/// At or above this delta (percent) the candidate counts as slower.
pub const REGRESSION_THRESHOLD_PCT: f64 = 10.0;

/// Classification of the latency delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeSignal {
	Improvement,
	Regression,
	Neutral,
	/// Baseline recorded no timed runs; the delta is undefined.
	Unknown,
}

impl RuntimeSignal {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Improvement => "improvement",
			Self::Regression => "regression",
			Self::Neutral => "neutral",
			Self::Unknown => "unknown",
		}
	}
}

impl fmt::Display for RuntimeSignal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Percentage change of the candidate average over the baseline average.
///
/// `None` when the baseline average is zero.
pub fn delta_percent(avg_baseline: u64, avg_candidate: u64) -> Option<f64> {
	if avg_baseline == 0 {
		return None;
	}
	let base = avg_baseline as f64;
	Some((avg_candidate as f64 - base) / base * 100.0)
}

/// Bucket a delta into a runtime signal. Both thresholds are inclusive.
pub fn classify(delta: Option<f64>) -> RuntimeSignal {
	match delta {
		None => RuntimeSignal::Unknown,
		Some(d) if d <= IMPROVEMENT_THRESHOLD_PCT => RuntimeSignal::Improvement,
		Some(d) if d >= REGRESSION_THRESHOLD_PCT => RuntimeSignal::Regression,
		Some(_) => RuntimeSignal::Neutral,
	}
}
