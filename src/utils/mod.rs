//! Utility modules for common functionality.
//!
//! - constants: Constants for the application
//! - cron_utils: Cron parsing and next-occurrence helpers
//! - logging: Logging setup and the shared error context
//! - parsing: Parsing of command line values
//! - tests: Test helpers (builders and a recording launcher)

mod cron_utils;

pub mod constants;
pub mod logging;
pub mod parsing;
pub mod tests;

pub use constants::*;
pub use cron_utils::*;
pub use parsing::*;
