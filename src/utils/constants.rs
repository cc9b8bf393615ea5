//! Constants shared across the daemon.

use std::time::Duration;

/// Window during which repeated filesystem events for one path are dropped
pub const DEBOUNCE_WINDOW: Duration = Duration::from_secs(1);

/// Trigger file read when no `--config` path is given
pub const DEFAULT_TRIGGER_CONFIG_PATH: &str = "triggers.json";

/// Quiet period used to coalesce bursts of writes to the trigger file
pub const CONFIG_RELOAD_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Capacity of the channel between a `notify` callback and its handler task
pub const WATCH_EVENT_CHANNEL_CAPACITY: usize = 100;
