use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Failures of a summary run. All of them abort the run; there is no partial report.
#[derive(Debug, Error)]
pub enum Error {
	/// A required log holds no execution summary line.
	#[error("no execution summary line found in {}", path.display())]
	MissingMetrics { path: PathBuf },
	/// A supplied path does not exist or cannot be read.
	#[error("cannot read {}: {source}", path.display())]
	FileAccess {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	/// The authoritative summary line carries a number outside the u64 range.
	#[error("invalid {field} value {value:?} in {}", path.display())]
	InvalidMetric { path: PathBuf, field: &'static str, value: String },
	/// Writing the report failed.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	#[error("config: {0}")]
	Config(String),
	#[error("serde: {0}")]
	Serde(#[from] serde_json::Error),
}

impl Error {
	pub fn config(msg: impl Into<String>) -> Self { Self::Config(msg.into()) }

	pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::FileAccess { path: path.into(), source }
	}
}
