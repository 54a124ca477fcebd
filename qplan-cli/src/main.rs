#![forbid(unsafe_code)]

//! Command line entry point for the query-plan regression summary.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use qplan_core::config::{ToolConfig, ENV_CONFIG, TEMPLATE_TOML};
use qplan_core::{analyze, report, AnalysisInput, OutputFormat};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Parser)]
#[command(
	name = "qplan-cli",
	version,
	about = "Summarize likely query-plan performance regression/improvement signals",
	subcommand_negates_reqs = true
)]
struct Cli {
	/// Execution log of the baseline run
	#[arg(long, value_name = "PATH", required = true)]
	baseline_log: Option<PathBuf>,
	/// Execution log of the candidate run
	#[arg(long, value_name = "PATH", required = true)]
	candidate_log: Option<PathBuf>,
	/// Semantic comparison log with per-stage plan diff rows
	#[arg(long, value_name = "PATH")]
	comparison_log: Option<PathBuf>,
	/// Report format: text or json (default from config)
	#[arg(long)]
	format: Option<OutputFormat>,
	/// TOML config file (default: $QPLAN_CONFIG)
	#[arg(long, global = true, value_name = "PATH")]
	config: Option<PathBuf>,
	/// Debug logging on stderr unless RUST_LOG is set
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Config helpers
	Config {
		#[command(subcommand)]
		action: ConfigCmd,
	},
}

#[derive(Debug, Subcommand)]
enum ConfigCmd {
	/// Show effective config (defaults, file, env)
	Show,
	/// Write a qplan.toml template
	WriteTemplate {
		/// Destination path (default: ./qplan.toml)
		#[arg(long)]
		path: Option<PathBuf>,
		/// Overwrite if file exists
		#[arg(long)]
		force: bool,
	},
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	let config_path = config_file(cli.config.clone());
	let cfg = load_config(config_path.as_deref())?;
	init_tracing(&cfg, cli.verbose);
	debug!(?cfg, config_file = ?config_path, "effective config");

	match cli.command {
		Some(Command::Config { action }) => run_config(action, &cfg, config_path.as_deref()),
		None => {
			let (Some(baseline_log), Some(candidate_log)) = (cli.baseline_log, cli.candidate_log) else {
				bail!("--baseline-log and --candidate-log are required");
			};
			let input = AnalysisInput { baseline_log, candidate_log, comparison_log: cli.comparison_log };
			let summary = analyze(&input)?;
			report::write_report(std::io::stdout().lock(), &summary, cli.format.unwrap_or(cfg.format))?;
			Ok(())
		}
	}
}

/// `--config` wins over `$QPLAN_CONFIG`; blank values are ignored.
fn config_file(flag: Option<PathBuf>) -> Option<PathBuf> {
	flag.or_else(|| {
		std::env::var(ENV_CONFIG)
			.ok()
			.map(|p| p.trim().to_string())
			.filter(|p| !p.is_empty())
			.map(PathBuf::from)
	})
}

fn load_config(path: Option<&Path>) -> Result<ToolConfig> {
	let base = match path {
		Some(p) => ToolConfig::load_from_file(p).with_context(|| format!("loading config {}", p.display()))?,
		None => ToolConfig::default(),
	};
	Ok(base.apply_env()?)
}

fn init_tracing(cfg: &ToolConfig, verbose: bool) {
	let level = if verbose { "debug" } else { cfg.log_level.as_str() };
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
	// stdout carries the report only
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(std::io::stderr)
		.init();
}

fn run_config(action: ConfigCmd, cfg: &ToolConfig, config_path: Option<&Path>) -> Result<()> {
	match action {
		ConfigCmd::Show => {
			let out = json!({
				"log_level": cfg.log_level,
				"format": cfg.format,
				"config_file": config_path.map(|p| p.display().to_string()),
			});
			println!("{}", serde_json::to_string_pretty(&out)?);
		}
		ConfigCmd::WriteTemplate { path, force } => {
			let path = path.unwrap_or_else(|| PathBuf::from("qplan.toml"));
			if path.exists() && !force {
				bail!("refusing to overwrite existing file: {} (use --force)", path.display());
			}
			std::fs::write(&path, TEMPLATE_TOML).with_context(|| format!("writing {}", path.display()))?;
			eprintln!("wrote {}", path.display());
		}
	}
	Ok(())
}
