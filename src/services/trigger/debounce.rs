//! Per-path launch debouncing for filesystem triggers.
//!
//! A burst of notifications for one file (editors commonly write a file in
//! several steps) should launch the script once. The first event for a path
//! always launches; later events for the same path are dropped until the
//! window has elapsed since the last launch.

use std::{
	collections::HashMap,
	path::{Path, PathBuf},
	time::Duration,
};
use tokio::{sync::Mutex, time::Instant};

/// Last launch instant per absolute path.
///
/// Entries are created on first launch, overwritten on each later launch and
/// never removed.
#[derive(Debug)]
pub struct DebounceCache {
	window: Duration,
	last_launch: HashMap<PathBuf, Instant>,
}

impl DebounceCache {
	pub fn new(window: Duration) -> Self {
		Self {
			window,
			last_launch: HashMap::new(),
		}
	}

	/// Returns true iff `path` launched less than one window before `now`.
	pub fn should_suppress(&self, path: &Path, now: Instant) -> bool {
		self.last_launch
			.get(path)
			.is_some_and(|last| now < *last + self.window)
	}

	pub fn record_launch(&mut self, path: &Path, now: Instant) {
		self.last_launch.insert(path.to_path_buf(), now);
	}

	/// Number of paths that have launched at least once.
	pub fn tracked_paths(&self) -> usize {
		self.last_launch.len()
	}
}

/// Shared debounce state for every filesystem trigger of the engine.
#[derive(Debug)]
pub struct DebounceGuard {
	cache: Mutex<DebounceCache>,
}

impl DebounceGuard {
	pub fn new(window: Duration) -> Self {
		Self {
			cache: Mutex::new(DebounceCache::new(window)),
		}
	}

	/// Runs `launch` unless `path` is inside its debounce window.
	///
	/// The check, the launch and the record happen under one lock, so two
	/// concurrent events for the same path cannot both launch. The launch time
	/// is recorded whatever `launch` returns. Returns `None` when suppressed.
	pub async fn run_if_due<R>(&self, path: &Path, launch: impl FnOnce() -> R) -> Option<R> {
		let mut cache = self.cache.lock().await;
		let now = Instant::now();

		if cache.should_suppress(path, now) {
			tracing::debug!(path = %path.display(), "Suppressed repeated event within debounce window");
			return None;
		}

		let result = launch();
		cache.record_launch(path, now);
		Some(result)
	}

	/// Number of paths that have launched at least once.
	pub async fn tracked_paths(&self) -> usize {
		self.cache.lock().await.tracked_paths()
	}
}
