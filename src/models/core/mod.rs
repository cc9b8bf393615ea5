//! Core domain models.
//!
//! - Triggers: a script plus the event source (cron schedule or watched
//!   directory) that fires it
//! - Script languages: how a script file is run, derived from its extension

mod script;
mod trigger;

pub use script::ScriptLanguage;
pub use trigger::{Trigger, TriggerType, TriggerTypeConfig};
