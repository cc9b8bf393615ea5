//! Trigger scheduling and dispatch.
//!
//! - `cron`: self-rescheduling timer per cron trigger
//! - `filesystem`: recursive directory watch per filesystem trigger
//! - `debounce`: per-path suppression of repeated filesystem launches
//! - `engine`: arms a trigger list and replaces it on reload

mod cron;
mod debounce;
mod engine;
mod error;
mod filesystem;

pub use cron::{next_fire, CronTriggerHandler};
pub use debounce::{DebounceCache, DebounceGuard};
pub use engine::{ReloadFailure, ReloadReport, TriggerEngine};
pub use error::TriggerError;
pub use filesystem::{ChangeType, FileEvent, FileWatchHandler};
