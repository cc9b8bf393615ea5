//! Trigger file watcher.
//!
//! Turns writes to the trigger file into reload signals. The file's directory is
//! watched non-recursively because editors often replace a file rather than
//! write it in place. A burst of writes yields one signal once the file has been
//! quiet for [`CONFIG_RELOAD_QUIET_PERIOD`].

use crate::{
	services::trigger::TriggerError,
	utils::{CONFIG_RELOAD_QUIET_PERIOD, WATCH_EVENT_CHANNEL_CAPACITY},
};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::{
	collections::HashMap,
	ffi::{OsStr, OsString},
	path::Path,
	time::Duration,
};
use tokio::{sync::mpsc, task::JoinHandle, time::Instant};

/// Returns true for a create or modify event touching `file_name`.
pub fn is_config_event(event: &Event, file_name: &OsStr) -> bool {
	matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
		&& event
			.paths
			.iter()
			.any(|p| p.file_name() == Some(file_name))
}

/// Forwards one reload signal per burst of trigger file events.
///
/// Ends when the watcher side closes or nobody listens for reloads anymore.
pub async fn forward_reloads(
	mut raw: mpsc::Receiver<notify::Result<Event>>,
	file_name: OsString,
	reload_tx: mpsc::Sender<()>,
	quiet_period: Duration,
) {
	while let Some(received) = raw.recv().await {
		let event = match received {
			Ok(event) => event,
			Err(e) => {
				tracing::warn!(error = %e, "Config watcher reported an error");
				continue;
			}
		};
		if !is_config_event(&event, &file_name) {
			continue;
		}

		let mut deadline = Instant::now() + quiet_period;
		loop {
			tokio::select! {
				_ = tokio::time::sleep_until(deadline) => break,
				next = raw.recv() => match next {
					Some(Ok(e)) if is_config_event(&e, &file_name) => {
						deadline = Instant::now() + quiet_period;
					}
					Some(_) => {}
					None => break,
				}
			}
		}

		tracing::info!("Trigger file changed, requesting reload");
		if reload_tx.send(()).await.is_err() {
			return;
		}
	}
}

/// Keeps the trigger file watch alive; dropping it stops the reload signals.
pub struct ConfigWatcher {
	_watcher: RecommendedWatcher,
	task: JoinHandle<()>,
}

impl ConfigWatcher {
	/// Starts watching `config_path`, sending `()` on `reload_tx` after each burst of writes.
	pub fn new(config_path: &Path, reload_tx: mpsc::Sender<()>) -> Result<Self, TriggerError> {
		let metadata = || {
			Some(HashMap::from([(
				"path".to_string(),
				config_path.display().to_string(),
			)]))
		};

		let file_name = config_path.file_name().map(OsStr::to_os_string).ok_or_else(|| {
			TriggerError::configuration_error("Trigger file path has no file name", None, metadata())
		})?;
		let directory = match config_path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent,
			_ => Path::new("."),
		};

		let (tx, raw) = mpsc::channel(WATCH_EVENT_CHANNEL_CAPACITY);
		let mut watcher = RecommendedWatcher::new(
			move |res: notify::Result<Event>| {
				let _ = tx.blocking_send(res);
			},
			Config::default(),
		)
		.map_err(|e| {
			TriggerError::watch_error(
				"Failed to create config watcher",
				Some(Box::new(e)),
				metadata(),
			)
		})?;

		watcher
			.watch(directory, RecursiveMode::NonRecursive)
			.map_err(|e| {
				TriggerError::watch_error(
					"Failed to watch trigger file directory",
					Some(Box::new(e)),
					metadata(),
				)
			})?;

		tracing::info!("Watching trigger file {}", config_path.display());

		let task = tokio::spawn(forward_reloads(
			raw,
			file_name,
			reload_tx,
			CONFIG_RELOAD_QUIET_PERIOD,
		));

		Ok(Self {
			_watcher: watcher,
			task,
		})
	}
}

impl Drop for ConfigWatcher {
	fn drop(&mut self) {
		self.task.abort();
	}
}
