//! Cron trigger handler.
//!
//! Each armed cron trigger runs as one task: compute the next occurrence, sleep
//! until it, launch the script, repeat. The shutdown signal is checked before
//! every re-arm and raced against every sleep. Missed occurrences are not
//! caught up.

use crate::{
	services::{launcher::ScriptLauncher, trigger::error::TriggerError},
	utils::{logging::error::TraceableError, next_occurrence, parse_cron_schedule},
};
use chrono::{DateTime, Local, TimeZone};
use cron::Schedule;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::watch;

/// Computes the next target and how long to wait for it.
///
/// The base is the later of `now` and the previous target, so a wall clock that
/// lags behind the timer cannot yield the occurrence that just fired.
pub fn next_fire<Tz: TimeZone>(
	schedule: &Schedule,
	now: &DateTime<Tz>,
	previous_target: Option<&DateTime<Tz>>,
) -> Option<(DateTime<Tz>, Duration)> {
	let base = match previous_target {
		Some(target) if target > now => target,
		_ => now,
	};
	let next = next_occurrence(schedule, base)?;
	let delay = (next.clone() - now.clone())
		.to_std()
		.unwrap_or(Duration::ZERO);
	Some((next, delay))
}

/// A parsed cron trigger ready to run.
pub struct CronTriggerHandler {
	script_path: String,
	cron_expression: String,
	schedule: Schedule,
	launcher: Arc<dyn ScriptLauncher>,
}

impl CronTriggerHandler {
	/// Parses the expression; an invalid one is a configuration error.
	pub fn new(
		script_path: &str,
		cron_expression: &str,
		launcher: Arc<dyn ScriptLauncher>,
	) -> Result<Self, TriggerError> {
		let schedule = parse_cron_schedule(cron_expression).map_err(|e| {
			TriggerError::configuration_error(
				format!("Invalid cron expression: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([
					("script_path".to_string(), script_path.to_string()),
					("cron_expression".to_string(), cron_expression.to_string()),
				])),
			)
		})?;

		Ok(Self {
			script_path: script_path.to_string(),
			cron_expression: cron_expression.to_string(),
			schedule,
			launcher,
		})
	}

	fn fire(&self) {
		if let Err(e) = self.launcher.launch(&self.script_path, &[]) {
			tracing::error!(
				script_path = %self.script_path,
				cron_expression = %self.cron_expression,
				trace_id = %e.trace_id(),
				"Failed to launch cron script: {}",
				e
			);
		}
	}

	/// Runs until `shutdown` flips to true or its sender is dropped.
	pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
		let mut previous_target: Option<DateTime<Local>> = None;

		loop {
			if *shutdown.borrow() {
				break;
			}

			let now = Local::now();
			let Some((target, delay)) = next_fire(&self.schedule, &now, previous_target.as_ref())
			else {
				tracing::error!(
					script_path = %self.script_path,
					cron_expression = %self.cron_expression,
					"Cron expression has no upcoming occurrence"
				);
				return;
			};

			tracing::debug!(
				script_path = %self.script_path,
				next = %target,
				"Cron trigger scheduled"
			);

			tokio::select! {
				_ = tokio::time::sleep(delay) => {}
				_ = shutdown.changed() => break,
			}

			previous_target = Some(target);
			self.fire();
		}

		tracing::debug!(script_path = %self.script_path, "Cron trigger stopped");
	}
}
