//! Script path validation.

use crate::models::{ConfigError, ScriptLanguage};
use std::{collections::HashMap, path::Path};

/// Validates that a script can be launched.
///
/// # Arguments
/// * `script_path` - Path to the script file
///
/// # Returns
/// * `Ok(ScriptLanguage)` detected from the file extension
/// * `Err(ConfigError)` if the file is missing or the extension is unsupported
#[allow(clippy::result_large_err)]
pub fn validate_script_config(script_path: &str) -> Result<ScriptLanguage, ConfigError> {
	let path = Path::new(script_path);
	let metadata = || {
		Some(HashMap::from([(
			"script_path".to_string(),
			script_path.to_string(),
		)]))
	};

	if !path.is_file() {
		return Err(ConfigError::validation_error(
			format!("Script path does not exist: {}", script_path),
			None,
			metadata(),
		));
	}

	ScriptLanguage::from_path(path).ok_or_else(|| {
		ConfigError::validation_error(
			format!("Unsupported script kind: {}", script_path),
			None,
			metadata(),
		)
	})
}
