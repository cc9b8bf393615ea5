//! Domain models and data structures for the job executor.
//!
//! - `config`: Trigger file loading and validation
//! - `core`: Core domain models (Trigger, ScriptLanguage)

mod config;
mod core;

// Re-export core types
pub use core::{ScriptLanguage, Trigger, TriggerType, TriggerTypeConfig};

// Re-export config types
pub use config::{ConfigError, ConfigLoader, TriggerConfigFile};
