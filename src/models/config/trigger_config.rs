//! Trigger configuration loading and validation.
//!
//! Implements [`ConfigLoader`] for [`Trigger`], reading the trigger list from a
//! JSON file of the form `{"triggers": [...]}`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::HashMap, path::Path};

use crate::{
	models::{config::error::ConfigError, ConfigLoader, Trigger, TriggerTypeConfig},
	services::launcher::validate_script_config,
	utils::{next_occurrence, parse_cron_schedule, DEFAULT_TRIGGER_CONFIG_PATH},
};

/// File structure for the trigger configuration file
///
/// Entries are kept as raw JSON so each one can be parsed and rejected on its own.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TriggerConfigFile {
	/// Trigger entries in file order, in the current or the legacy shape
	#[serde(default, alias = "Triggers")]
	pub triggers: Vec<Value>,
}

/// Rewrites an entry in the legacy shape into the current one.
///
/// Legacy entries carry `ScriptFileName` and either `CronExpression` or
/// `WatchedPath`; the kind is implied by which payload key is present and any
/// `Type` field is ignored. Entries that already have a `kind` pass through.
fn upgrade_legacy_entry(entry: Value) -> Value {
	let Value::Object(mut fields) = entry else {
		return entry;
	};
	if fields.contains_key("kind") || !fields.contains_key("ScriptFileName") {
		return Value::Object(fields);
	}

	if let Some(script_path) = fields.remove("ScriptFileName") {
		fields.insert("script_path".to_string(), script_path);
	}
	fields.remove("Type");

	if let Some(cron_expression) = fields.remove("CronExpression") {
		fields.insert("cron_expression".to_string(), cron_expression);
		fields.insert("kind".to_string(), Value::from("Cron"));
	} else if let Some(watched_path) = fields.remove("WatchedPath") {
		fields.insert("watched_path".to_string(), watched_path);
		fields.insert("kind".to_string(), Value::from("FileWatch"));
	}

	Value::Object(fields)
}

impl TriggerConfigFile {
	/// Parses every entry, returning the valid triggers and one error per rejected entry.
	pub fn into_triggers(self) -> (Vec<Trigger>, Vec<ConfigError>) {
		let mut triggers = Vec::with_capacity(self.triggers.len());
		let mut rejected = Vec::new();

		for (index, entry) in self.triggers.into_iter().enumerate() {
			match serde_json::from_value::<Trigger>(upgrade_legacy_entry(entry)) {
				Ok(trigger) => triggers.push(trigger),
				Err(e) => rejected.push(ConfigError::parse_error(
					format!("failed to parse trigger entry: {}", e),
					Some(Box::new(e)),
					Some(HashMap::from([("index".to_string(), index.to_string())])),
				)),
			}
		}

		(triggers, rejected)
	}
}

/// Creates the trigger file with an empty list when it does not exist yet.
async fn create_file_if_missing(path: &Path) -> Result<(), ConfigError> {
	if tokio::fs::try_exists(path).await? {
		return Ok(());
	}

	let content = serde_json::to_string_pretty(&TriggerConfigFile::default())?;
	tokio::fs::write(path, content).await.map_err(|e| {
		ConfigError::file_error(
			format!("failed to create trigger config file: {}", e),
			Some(Box::new(e)),
			Some(HashMap::from([(
				"path".to_string(),
				path.display().to_string(),
			)])),
		)
	})?;

	tracing::info!("Created empty trigger config file: {}", path.display());
	Ok(())
}

#[async_trait]
impl ConfigLoader for Trigger {
	/// Load all triggers from the trigger file
	///
	/// A missing file is created empty. Entries that fail to parse are logged and
	/// skipped; a file that is not JSON at all is an error.
	async fn load_all<T>(path: Option<&Path>) -> Result<T, ConfigError>
	where
		T: FromIterator<Self>,
	{
		let path = path.unwrap_or(Path::new(DEFAULT_TRIGGER_CONFIG_PATH));
		let path_metadata = || {
			Some(HashMap::from([(
				"path".to_string(),
				path.display().to_string(),
			)]))
		};

		if !Self::is_json_file(path) {
			tracing::warn!(
				"Trigger config file does not have a .json extension: {}",
				path.display()
			);
		}

		create_file_if_missing(path).await?;

		let content = tokio::fs::read_to_string(path).await.map_err(|e| {
			ConfigError::file_error(
				format!("failed to read trigger config file: {}", e),
				Some(Box::new(e)),
				path_metadata(),
			)
		})?;

		let file: TriggerConfigFile = serde_json::from_str(&content).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse trigger config: {}", e),
				Some(Box::new(e)),
				path_metadata(),
			)
		})?;

		let (triggers, rejected) = file.into_triggers();
		for error in &rejected {
			tracing::error!(
				path = %path.display(),
				"Skipping trigger entry: {}",
				error
			);
		}

		tracing::debug!(
			loaded = triggers.len(),
			rejected = rejected.len(),
			"Loaded trigger config from {}",
			path.display()
		);

		Ok(T::from_iter(triggers))
	}

	/// Validate the trigger configuration
	///
	/// Ensures that:
	/// - The script exists and has a supported extension
	/// - A cron expression parses and has an upcoming occurrence
	/// - A watched path is an existing directory
	/// - The kind is known
	fn validate(&self) -> Result<(), ConfigError> {
		if self.script_path.trim().is_empty() {
			return Err(ConfigError::validation_error(
				"Script path cannot be empty",
				None,
				None,
			));
		}

		validate_script_config(&self.script_path)?;

		match &self.config {
			TriggerTypeConfig::Cron { cron_expression } => {
				let schedule = parse_cron_schedule(cron_expression).map_err(|e| {
					ConfigError::validation_error(
						format!("Invalid cron expression: {}", e),
						Some(Box::new(e)),
						Some(HashMap::from([(
							"cron_expression".to_string(),
							cron_expression.clone(),
						)])),
					)
				})?;

				if next_occurrence(&schedule, &chrono::Local::now()).is_none() {
					return Err(ConfigError::validation_error(
						"Cron expression has no upcoming occurrence",
						None,
						Some(HashMap::from([(
							"cron_expression".to_string(),
							cron_expression.clone(),
						)])),
					));
				}
			}
			TriggerTypeConfig::FileWatch { watched_path } => {
				if !Path::new(watched_path).is_dir() {
					return Err(ConfigError::validation_error(
						"Watched path is not an existing directory",
						None,
						Some(HashMap::from([(
							"watched_path".to_string(),
							watched_path.clone(),
						)])),
					));
				}
			}
			TriggerTypeConfig::Unknown => {
				return Err(ConfigError::validation_error(
					"Unknown trigger kind",
					None,
					Some(HashMap::from([(
						"script_path".to_string(),
						self.script_path.clone(),
					)])),
				));
			}
		}

		Ok(())
	}
}
