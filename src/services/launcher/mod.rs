//! Script launcher implementation.
//!
//! Starts scripts as detached child processes, choosing the interpreter from the
//! script's file extension.

mod error;
mod executor;
mod validation;

pub use error::ScriptError;
pub use executor::{ProcessScriptLauncher, ScriptLauncher};
pub use validation::validate_script_config;
