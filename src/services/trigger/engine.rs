//! Trigger engine.
//!
//! Owns the armed generation of triggers. A reload tears the whole generation
//! down (signal, then await every task) before arming the next one, so two
//! generations never fire side by side.

use crate::{
	models::{Trigger, TriggerTypeConfig},
	services::{
		launcher::ScriptLauncher,
		trigger::{
			cron::CronTriggerHandler, debounce::DebounceGuard, error::TriggerError,
			filesystem::FileWatchHandler,
		},
	},
	utils::DEBOUNCE_WINDOW,
};
use futures::future::join_all;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{
	sync::{watch, Mutex},
	task::JoinHandle,
};

/// A trigger that could not be armed during a reload
#[derive(Debug)]
pub struct ReloadFailure {
	/// Position of the entry in the reloaded list
	pub index: usize,
	pub script_path: String,
	pub error: TriggerError,
}

/// Outcome of [`TriggerEngine::reload`]
#[derive(Debug, Default)]
pub struct ReloadReport {
	pub armed: usize,
	pub errors: Vec<ReloadFailure>,
}

struct ActiveTriggers {
	shutdown_tx: watch::Sender<bool>,
	handles: Vec<JoinHandle<()>>,
}

impl ActiveTriggers {
	async fn disarm(self) {
		let _ = self.shutdown_tx.send(true);
		for result in join_all(self.handles).await {
			if let Err(e) = result {
				tracing::error!(error = %e, "Trigger task ended abnormally");
			}
		}
	}
}

/// Arms triggers and keeps them running until the next reload or shutdown.
pub struct TriggerEngine {
	launcher: Arc<dyn ScriptLauncher>,
	debounce: Arc<DebounceGuard>,
	active: Mutex<Option<ActiveTriggers>>,
}

impl TriggerEngine {
	pub fn new(launcher: Arc<dyn ScriptLauncher>) -> Self {
		Self::with_debounce_window(launcher, DEBOUNCE_WINDOW)
	}

	pub fn with_debounce_window(launcher: Arc<dyn ScriptLauncher>, window: Duration) -> Self {
		Self {
			launcher,
			debounce: Arc::new(DebounceGuard::new(window)),
			active: Mutex::new(None),
		}
	}

	/// Replaces every armed trigger with `triggers`.
	///
	/// Entries that cannot be armed are reported and skipped; the rest of the
	/// list is armed regardless.
	#[tracing::instrument(skip_all, fields(count = triggers.len()))]
	pub async fn reload(&self, triggers: Vec<Trigger>) -> ReloadReport {
		let mut active = self.active.lock().await;
		if let Some(previous) = active.take() {
			let count = previous.handles.len();
			previous.disarm().await;
			tracing::debug!(count, "Disarmed previous triggers");
		}

		let (shutdown_tx, shutdown_rx) = watch::channel(false);
		let mut handles = Vec::with_capacity(triggers.len());
		let mut errors = Vec::new();

		for (index, trigger) in triggers.into_iter().enumerate() {
			match self.arm(&trigger, shutdown_rx.clone()) {
				Ok(handle) => handles.push(handle),
				Err(error) => errors.push(ReloadFailure {
					index,
					script_path: trigger.script_path,
					error,
				}),
			}
		}

		let report = ReloadReport {
			armed: handles.len(),
			errors,
		};
		tracing::info!(
			armed = report.armed,
			failed = report.errors.len(),
			"Triggers reloaded"
		);

		*active = Some(ActiveTriggers {
			shutdown_tx,
			handles,
		});
		report
	}

	fn arm(
		&self,
		trigger: &Trigger,
		shutdown: watch::Receiver<bool>,
	) -> Result<JoinHandle<()>, TriggerError> {
		match &trigger.config {
			TriggerTypeConfig::Cron { cron_expression } => {
				let handler = CronTriggerHandler::new(
					&trigger.script_path,
					cron_expression,
					self.launcher.clone(),
				)?;
				Ok(tokio::spawn(handler.run(shutdown)))
			}
			TriggerTypeConfig::FileWatch { watched_path } => {
				let handler = FileWatchHandler::new(
					&trigger.script_path,
					watched_path,
					self.launcher.clone(),
					self.debounce.clone(),
				)?;
				Ok(tokio::spawn(handler.run(shutdown)))
			}
			TriggerTypeConfig::Unknown => Err(TriggerError::configuration_error(
				"Unknown trigger kind",
				None,
				Some(HashMap::from([(
					"script_path".to_string(),
					trigger.script_path.clone(),
				)])),
			)),
		}
	}

	/// Disarms every trigger and waits for their tasks to finish.
	pub async fn shutdown(&self) {
		if let Some(previous) = self.active.lock().await.take() {
			previous.disarm().await;
			tracing::info!("All triggers disarmed");
		}
	}

	/// Number of armed triggers whose task is still running.
	pub async fn active_count(&self) -> usize {
		self.active
			.lock()
			.await
			.as_ref()
			.map(|active| active.handles.iter().filter(|h| !h.is_finished()).count())
			.unwrap_or(0)
	}
}
