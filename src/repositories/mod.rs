//! Repository implementations for configuration management.
//!
//! The trigger repository reads the trigger file, keeping every entry that
//! parses, and validates the loaded triggers on request.

mod error;
mod trigger;

pub use error::RepositoryError;
pub use trigger::{TriggerRepository, TriggerRepositoryTrait};
