//! Configuration loading and validation.
//!
//! The trigger list is read from a single JSON file. Each entry is parsed on its
//! own so that one malformed trigger does not prevent its siblings from loading.

#![allow(clippy::result_large_err)]

use async_trait::async_trait;
use std::path::Path;

mod error;
mod trigger_config;

pub use error::ConfigError;
pub use trigger_config::TriggerConfigFile;

/// Common interface for loading configuration files
#[async_trait]
pub trait ConfigLoader: Sized {
	/// Load every valid entry from the configuration file
	///
	/// If no path is provided, uses the default trigger file.
	async fn load_all<T>(path: Option<&Path>) -> Result<T, ConfigError>
	where
		T: FromIterator<Self>;

	/// Validate the configuration
	///
	/// Returns Ok(()) if the entry can be armed as written.
	fn validate(&self) -> Result<(), ConfigError>;

	/// Check if a file is a JSON file based on extension
	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("json"))
			.unwrap_or(false)
	}
}
