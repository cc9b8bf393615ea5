//! Local job executor.
//!
//! Runs scripts on cron schedules and on filesystem changes. It includes:
//!
//! - A JSON trigger file, reloaded when it changes
//! - Cron triggers with seconds resolution
//! - Recursive directory watches with per-path debouncing
//! - Fire-and-forget script launches for PowerShell, shell, Python and Node scripts
//!
//! # Module Structure
//!
//! - `bootstrap`: Wires the repository, engine and reload signals together
//! - `models`: Trigger and script models, trigger file loading
//! - `repositories`: Trigger file repository
//! - `services`: Trigger engine, script launcher and config watcher
//! - `utils`: Logging, cron helpers, constants and test helpers

pub mod bootstrap;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;
