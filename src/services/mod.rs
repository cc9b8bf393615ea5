//! Core services implementing the daemon's behavior.
//!
//! - `config_watcher`: Reload signals on trigger file changes
//! - `launcher`: Starting scripts as child processes
//! - `trigger`: Cron and filesystem triggers and the engine that arms them

pub mod config_watcher;
pub mod launcher;
pub mod trigger;
