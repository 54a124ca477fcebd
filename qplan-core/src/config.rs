use crate::error::{Error, Result};
use crate::report::OutputFormat;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Environment variable naming a config file.
pub const ENV_CONFIG: &str = "QPLAN_CONFIG";
pub const ENV_LOG_LEVEL: &str = "QPLAN_LOG_LEVEL";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Settings for the summary tool. Flags on the command line override these.
///
/// The report format has no environment override: stdout stays plain text
/// unless `--format` or a config file asks otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToolConfig {
	pub log_level: String,
	pub format: OutputFormat,
}

impl Default for ToolConfig {
	fn default() -> Self {
		Self { log_level: "warn".into(), format: OutputFormat::Text }
	}
}

impl ToolConfig {
	pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let data = fs::read_to_string(path).map_err(|e| Error::file_access(path, e))?;
		let cfg: Self = toml::from_str(&data)
			.map_err(|e| Error::config(format!("toml parse error in {}: {e}", path.display())))?;
		cfg.validate()?;
		Ok(cfg)
	}

	pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
		let path = path.as_ref();
		let data = toml::to_string_pretty(self).map_err(|e| Error::config(format!("toml encode error: {e}")))?;
		fs::write(path, data).map_err(|e| Error::file_access(path, e))
	}

	/// Overlay `QPLAN_LOG_LEVEL` from the process environment.
	pub fn apply_env(self) -> Result<Self> { self.apply_vars(|k| std::env::var(k).ok()) }

	/// Overlay variables resolved through `lookup`. Blank values are ignored.
	pub fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
		let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
		if let Some(v) = get(ENV_LOG_LEVEL) { self.log_level = v.to_ascii_lowercase(); }
		self.validate()?;
		Ok(self)
	}

	pub fn validate(&self) -> Result<()> {
		if !LOG_LEVELS.contains(&self.log_level.as_str()) {
			return Err(Error::config(format!("invalid log_level: {}", self.log_level)));
		}
		Ok(())
	}
}

/// Commented template written by `config write-template`.
pub const TEMPLATE_TOML: &str = r#"# qplan-cli configuration (template)
#
# Lookup: --config <path>, else $QPLAN_CONFIG.
# $QPLAN_LOG_LEVEL overrides log_level; flags override both.

# trace | debug | info | warn | error (RUST_LOG takes precedence when set)
log_level = "warn"

# text | json
format = "text"
"#;
