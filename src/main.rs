//! Job executor entry point.
//!
//! Loads the trigger file, arms its triggers and keeps them running until
//! Ctrl+C. Writes to the trigger file reload the whole list.
//!
//! # Flow
//! 1. Applies CLI flags and `.env` to the environment and sets up logging
//! 2. Loads the trigger file (created empty when missing) and arms every valid trigger
//! 3. Watches the trigger file and reloads on change
//! 4. Disarms everything on Ctrl+C

use job_executor::{
	bootstrap::{create_engine, reload_from_repository, run_reload_loop, Result},
	repositories::{TriggerRepository, TriggerRepositoryTrait},
	services::{config_watcher::ConfigWatcher, launcher::ProcessScriptLauncher},
	utils::{logging::setup_logging, parse_string_to_bytes_size, DEFAULT_TRIGGER_CONFIG_PATH},
};

use clap::Parser;
use dotenvy::dotenv_override;
use std::{
	env::{set_var, var},
	path::{Path, PathBuf},
	sync::Arc,
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(
	name = "job-executor",
	about = "Runs scripts on cron schedules and on filesystem changes, as declared in a JSON trigger file.",
	version
)]
struct Cli {
	/// Path to the trigger file
	#[arg(long, value_name = "PATH", default_value = DEFAULT_TRIGGER_CONFIG_PATH)]
	config: PathBuf,

	/// Validate the trigger file without starting the service
	#[arg(long)]
	check: bool,

	/// Write logs to file instead of stdout
	#[arg(long)]
	log_file: bool,

	/// Set log level (trace, debug, info, warn, error)
	#[arg(long, value_name = "LEVEL")]
	log_level: Option<String>,

	/// Path to store log files (default: logs/)
	#[arg(long, value_name = "PATH")]
	log_path: Option<String>,

	/// Maximum log file size before rolling (e.g., "1GB", "500MB", "1024KB")
	#[arg(long, value_name = "SIZE", value_parser = parse_string_to_bytes_size)]
	log_max_size: Option<u64>,
}

impl Cli {
	/// Apply CLI options to environment variables, overriding any existing values
	fn apply_to_env(&self) {
		// Values from .env override the inherited environment
		dotenv_override().ok();

		if self.log_file {
			set_var("LOG_MODE", "file");
		}

		if let Ok(level) = var("RUST_LOG") {
			set_var("LOG_LEVEL", level);
		}

		if let Some(level) = &self.log_level {
			set_var("LOG_LEVEL", level);
			set_var("RUST_LOG", level);
		}

		if let Some(path) = &self.log_path {
			set_var("LOG_DATA_DIR", path);
		}

		if let Some(max_size) = &self.log_max_size {
			set_var("LOG_MAX_SIZE", max_size.to_string());
		}
	}
}

/// Loads and validates every trigger, logging the outcome.
async fn validate_configuration(path: &Path) {
	info!("Validating trigger file {}", path.display());

	// Load and validation errors log themselves on creation.
	let valid = match TriggerRepository::new(Some(path)).await {
		Ok(repository) => repository.validate().is_ok(),
		Err(_) => false,
	};

	if valid {
		info!("Trigger file is valid");
	} else {
		warn!("Trigger file is invalid");
	}
}

/// Main entry point for the job executor.
///
/// # Errors
/// Returns an error if the trigger file cannot be loaded at startup.
#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	cli.apply_to_env();

	setup_logging().unwrap_or_else(|e| {
		eprintln!("Failed to setup logging: {}", e);
	});

	if cli.check {
		validate_configuration(&cli.config).await;
		return Ok(());
	}

	let engine = create_engine(Arc::new(ProcessScriptLauncher::new()));
	reload_from_repository::<TriggerRepository>(&engine, &cli.config)
		.await
		.map_err(|e| anyhow::anyhow!("Failed to load triggers: {}", e))?;

	let (reload_tx, reload_rx) = mpsc::channel(1);
	let _config_watcher = match ConfigWatcher::new(&cli.config, reload_tx) {
		Ok(watcher) => Some(watcher),
		Err(e) => {
			error!("Trigger file changes will not be picked up: {}", e);
			None
		}
	};

	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let reload_task = tokio::spawn(run_reload_loop::<TriggerRepository>(
		engine.clone(),
		cli.config.clone(),
		reload_rx,
		shutdown_rx,
	));

	info!("Service started. Press Ctrl+C to shutdown");

	if let Err(e) = tokio::signal::ctrl_c().await {
		error!("Error waiting for Ctrl+C: {}", e);
	}
	info!("Shutdown signal received, stopping triggers...");

	let _ = shutdown_tx.send(true);
	if let Err(e) = reload_task.await {
		error!("Reload task ended abnormally: {}", e);
	}
	engine.shutdown().await;

	info!("Shutdown complete");
	Ok(())
}
