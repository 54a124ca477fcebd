use crate::delta::RuntimeSignal;
use crate::metrics::ExecutionMetrics;
use crate::semantic::PlanChanges;
use serde::{Serialize, Serializer};
use std::fmt;

/// Final combined classification. The strings are matched by downstream tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
	ResultCountChanged,
	RegressionWithPlanShapeChange,
	ImprovementWithOptimizerPlanChange,
	PossibleRegression,
	PossibleImprovement,
	PlanChangedRuntimeNeutral,
	NoClearSignal,
}

impl Verdict {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::ResultCountChanged => "semantic regression risk: result count changed; runtime delta not comparable",
			Self::RegressionWithPlanShapeChange => "likely performance regression with plan-shape change",
			Self::ImprovementWithOptimizerPlanChange => "likely performance improvement with optimizer-plan change",
			Self::PossibleRegression => "possible performance regression (no semantic diff evidence provided)",
			Self::PossibleImprovement => "possible performance improvement",
			Self::PlanChangedRuntimeNeutral => "plan changed but runtime signal neutral",
			Self::NoClearSignal => "no clear regression/improvement signal",
		}
	}
}

impl fmt::Display for Verdict {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl Serialize for Verdict {
	fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> { s.serialize_str(self.as_str()) }
}

/// Combine runtime signal and plan changes into a verdict; first matching rule wins.
///
/// A result-count mismatch means the plans are not answering the same query,
/// so it overrides every timing and plan signal.
pub fn synthesize(
	baseline: &ExecutionMetrics,
	candidate: &ExecutionMetrics,
	signal: RuntimeSignal,
	changes: &PlanChanges,
) -> Verdict {
	use RuntimeSignal::{Improvement, Regression};

	if baseline.results != candidate.results {
		Verdict::ResultCountChanged
	} else if signal == Regression && changes.shape_changed() {
		Verdict::RegressionWithPlanShapeChange
	} else if signal == Improvement && changes.optimizer_changed() {
		Verdict::ImprovementWithOptimizerPlanChange
	} else if signal == Regression {
		Verdict::PossibleRegression
	} else if signal == Improvement {
		Verdict::PossibleImprovement
	} else if changes.any() {
		Verdict::PlanChangedRuntimeNeutral
	} else {
		Verdict::NoClearSignal
	}
}
