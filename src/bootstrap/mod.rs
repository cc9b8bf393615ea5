//! Bootstrap module wiring the repository, the engine and the reload signals.
//!
//! - `create_engine`: builds the trigger engine around a script launcher
//! - `reload_from_repository`: reads the trigger file and swaps the armed triggers
//! - `run_reload_loop`: reloads on every signal until shutdown

use std::{
	error::Error,
	path::{Path, PathBuf},
	sync::Arc,
};
use tokio::sync::{mpsc, watch};

use crate::{
	repositories::{RepositoryError, TriggerRepositoryTrait},
	services::{
		launcher::ScriptLauncher,
		trigger::{ReloadReport, TriggerEngine},
	},
	utils::logging::error::TraceableError,
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Creates the trigger engine that launches scripts through `launcher`.
pub fn create_engine(launcher: Arc<dyn ScriptLauncher>) -> Arc<TriggerEngine> {
	Arc::new(TriggerEngine::new(launcher))
}

/// Logs every entry that could not be armed.
pub fn log_reload_report(report: &ReloadReport) {
	for failure in &report.errors {
		tracing::error!(
			index = failure.index,
			script_path = %failure.script_path,
			"Trigger not armed: {}",
			failure.error
		);
	}
}

/// Loads the trigger file at `path` and reloads `engine` with its contents.
///
/// # Errors
/// Returns the load error when the file cannot be read; the engine keeps its
/// current triggers in that case.
#[tracing::instrument(skip(engine))]
pub async fn reload_from_repository<T: TriggerRepositoryTrait>(
	engine: &TriggerEngine,
	path: &Path,
) -> std::result::Result<ReloadReport, RepositoryError> {
	let repository = T::new(Some(path)).await?;
	let report = engine.reload(repository.get_all()).await;
	log_reload_report(&report);
	Ok(report)
}

/// Reloads `engine` from `path` on every message of `reload_rx`.
///
/// Runs until `shutdown` flips to true or the reload channel closes. A failed
/// load leaves the previous triggers armed.
pub async fn run_reload_loop<T: TriggerRepositoryTrait>(
	engine: Arc<TriggerEngine>,
	path: PathBuf,
	mut reload_rx: mpsc::Receiver<()>,
	mut shutdown: watch::Receiver<bool>,
) {
	loop {
		tokio::select! {
			signal = reload_rx.recv() => {
				if signal.is_none() {
					break;
				}
				match reload_from_repository::<T>(&engine, &path).await {
					Ok(report) => tracing::info!(armed = report.armed, "Reloaded trigger file"),
					Err(e) => tracing::warn!(trace_id = %e.trace_id(), "Keeping previous triggers"),
				}
			}
			_ = shutdown.changed() => break,
		}
	}
}
