//! Filesystem trigger handler.
//!
//! Watches a directory tree with `notify` and launches the script for each
//! qualifying change, passing `[change_type, name, full_path]`. Events are
//! forwarded from the watcher's callback thread through a bounded channel and
//! debounced per path.

use crate::{
	services::{
		launcher::ScriptLauncher,
		trigger::{debounce::DebounceGuard, error::TriggerError},
	},
	utils::{logging::error::TraceableError, WATCH_EVENT_CHANNEL_CAPACITY},
};
use notify::{
	event::{ModifyKind, RenameMode},
	Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
};
use std::{
	collections::HashMap,
	fmt,
	path::{Path, PathBuf},
	sync::Arc,
};
use tokio::sync::{mpsc, watch};

/// Change type label passed to scripts as their first argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
	Changed,
	Created,
	Deleted,
	Renamed,
}

impl fmt::Display for ChangeType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Changed => write!(f, "Changed"),
			Self::Created => write!(f, "Created"),
			Self::Deleted => write!(f, "Deleted"),
			Self::Renamed => write!(f, "Renamed"),
		}
	}
}

/// One filesystem change, as seen by the script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
	pub change_type: ChangeType,
	/// Path relative to the watched root
	pub name: String,
	pub full_path: PathBuf,
}

impl FileEvent {
	/// Converts a raw notification into zero or more file events.
	///
	/// Access notifications and the "from" half of a rename are dropped; a
	/// rename reporting both paths yields the new path.
	pub fn from_notify(event: &Event, root: &Path) -> Vec<FileEvent> {
		let change_type = match event.kind {
			EventKind::Access(_) => return Vec::new(),
			EventKind::Create(_) => ChangeType::Created,
			EventKind::Remove(_) => ChangeType::Deleted,
			EventKind::Modify(ModifyKind::Name(RenameMode::From)) => return Vec::new(),
			EventKind::Modify(ModifyKind::Name(_)) => ChangeType::Renamed,
			EventKind::Modify(_) | EventKind::Any | EventKind::Other => ChangeType::Changed,
		};

		let paths: Vec<&PathBuf> = match change_type {
			ChangeType::Renamed => event.paths.last().into_iter().collect(),
			_ => event.paths.iter().collect(),
		};

		paths
			.into_iter()
			.map(|full_path| FileEvent {
				change_type,
				name: relative_name(full_path, root),
				full_path: full_path.clone(),
			})
			.collect()
	}

	/// Positional script arguments, in launch order.
	pub fn to_arguments(&self) -> Vec<String> {
		vec![
			self.change_type.to_string(),
			self.name.clone(),
			self.full_path.display().to_string(),
		]
	}
}

fn relative_name(full_path: &Path, root: &Path) -> String {
	full_path
		.strip_prefix(root)
		.ok()
		.filter(|rel| !rel.as_os_str().is_empty())
		.or_else(|| full_path.file_name().map(Path::new))
		.unwrap_or(full_path)
		.display()
		.to_string()
}

/// Launch side of a filesystem trigger, shared by every event of one watch.
struct EventDispatch {
	script_path: String,
	root: PathBuf,
	launcher: Arc<dyn ScriptLauncher>,
	debounce: Arc<DebounceGuard>,
}

impl EventDispatch {
	async fn handle(&self, event: FileEvent) {
		let args = event.to_arguments();
		let outcome = self
			.debounce
			.run_if_due(&event.full_path, || {
				self.launcher.launch(&self.script_path, &args)
			})
			.await;

		if let Some(Err(e)) = outcome {
			tracing::error!(
				script_path = %self.script_path,
				full_path = %event.full_path.display(),
				trace_id = %e.trace_id(),
				"Failed to launch filesystem script: {}",
				e
			);
		}
	}
}

/// An armed filesystem trigger.
///
/// Holds the watcher; dropping the handler stops the subscription.
pub struct FileWatchHandler {
	watcher: RecommendedWatcher,
	events: mpsc::Receiver<notify::Result<Event>>,
	dispatch: EventDispatch,
}

impl FileWatchHandler {
	/// Subscribes to `watched_path` recursively.
	///
	/// Relative paths are made absolute against the working directory. Symlinks
	/// are not resolved, so scripts see paths under the configured root.
	///
	/// The path must be an existing directory; anything else is a configuration
	/// error. A watcher that cannot be created or attached is a watch error.
	pub fn new(
		script_path: &str,
		watched_path: &str,
		launcher: Arc<dyn ScriptLauncher>,
		debounce: Arc<DebounceGuard>,
	) -> Result<Self, TriggerError> {
		let metadata = || {
			Some(HashMap::from([
				("script_path".to_string(), script_path.to_string()),
				("watched_path".to_string(), watched_path.to_string()),
			]))
		};

		let root = std::path::absolute(watched_path)
			.ok()
			.filter(|p| p.is_dir())
			.ok_or_else(|| {
				TriggerError::configuration_error(
					"Watched path is not an existing directory",
					None,
					metadata(),
				)
			})?;

		let (tx, events) = mpsc::channel(WATCH_EVENT_CHANNEL_CAPACITY);
		let mut watcher = RecommendedWatcher::new(
			move |res: notify::Result<Event>| {
				let _ = tx.blocking_send(res);
			},
			Config::default(),
		)
		.map_err(|e| {
			TriggerError::watch_error("Failed to create watcher", Some(Box::new(e)), metadata())
		})?;

		watcher
			.watch(&root, RecursiveMode::Recursive)
			.map_err(|e| {
				TriggerError::watch_error("Failed to watch path", Some(Box::new(e)), metadata())
			})?;

		tracing::info!(script_path, watched_path = %root.display(), "Watching directory");

		Ok(Self {
			watcher,
			events,
			dispatch: EventDispatch {
				script_path: script_path.to_string(),
				root,
				launcher,
				debounce,
			},
		})
	}

	/// Runs until `shutdown` flips to true or its sender is dropped.
	pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
		let Self {
			watcher,
			mut events,
			dispatch,
		} = self;

		loop {
			if *shutdown.borrow() {
				break;
			}

			let received = tokio::select! {
				received = events.recv() => received,
				_ = shutdown.changed() => break,
			};

			match received {
				Some(Ok(event)) => {
					for file_event in FileEvent::from_notify(&event, &dispatch.root) {
						dispatch.handle(file_event).await;
					}
				}
				Some(Err(e)) => {
					tracing::warn!(
						script_path = %dispatch.script_path,
						error = %e,
						"Filesystem watcher reported an error"
					);
				}
				None => {
					tracing::error!(
						script_path = %dispatch.script_path,
						watched_path = %dispatch.root.display(),
						"Filesystem watcher stopped"
					);
					break;
				}
			}
		}

		drop(watcher);
		tracing::debug!(
			script_path = %dispatch.script_path,
			watched_path = %dispatch.root.display(),
			"Filesystem trigger stopped"
		);
	}
}
