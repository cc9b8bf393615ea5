//! Trigger repository implementation.
//!
//! Loads the trigger list from the JSON trigger file and validates it on
//! request. The list keeps file order so reload reports can point at entries by
//! index.

#![allow(clippy::result_large_err)]

use std::{
	collections::HashMap,
	path::{Path, PathBuf},
};

use async_trait::async_trait;

use crate::{
	models::{ConfigLoader, Trigger},
	repositories::error::RepositoryError,
	utils::DEFAULT_TRIGGER_CONFIG_PATH,
};

/// Repository holding the triggers read from one trigger file
#[derive(Debug, Clone)]
pub struct TriggerRepository {
	path: PathBuf,
	triggers: Vec<Trigger>,
}

impl TriggerRepository {
	/// Create a new trigger repository from the given path
	///
	/// Uses `triggers.json` in the working directory when no path is provided.
	pub async fn new(path: Option<&Path>) -> Result<Self, RepositoryError> {
		let path = path
			.map(Path::to_path_buf)
			.unwrap_or_else(|| PathBuf::from(DEFAULT_TRIGGER_CONFIG_PATH));
		let triggers = <Self as TriggerRepositoryTrait>::load_all(Some(&path)).await?;
		Ok(TriggerRepository { path, triggers })
	}
}

/// Interface for trigger repository implementations
#[async_trait]
pub trait TriggerRepositoryTrait: Clone + Send + Sync {
	/// Create a new trigger repository from the given path
	async fn new(path: Option<&Path>) -> Result<Self, RepositoryError>
	where
		Self: Sized;

	/// Load every parseable trigger from the given path
	async fn load_all(path: Option<&Path>) -> Result<Vec<Trigger>, RepositoryError>;

	/// All loaded triggers, in file order
	fn get_all(&self) -> Vec<Trigger>;

	/// Validates every trigger, logging each failure.
	///
	/// Returns a validation error summarizing the failures, if any.
	fn validate(&self) -> Result<(), RepositoryError>;
}

#[async_trait]
impl TriggerRepositoryTrait for TriggerRepository {
	async fn new(path: Option<&Path>) -> Result<Self, RepositoryError> {
		TriggerRepository::new(path).await
	}

	async fn load_all(path: Option<&Path>) -> Result<Vec<Trigger>, RepositoryError> {
		Trigger::load_all(path).await.map_err(|e| {
			RepositoryError::load_error(
				"Failed to load triggers",
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.map_or_else(
						|| DEFAULT_TRIGGER_CONFIG_PATH.to_string(),
						|p| p.display().to_string(),
					),
				)])),
			)
		})
	}

	fn get_all(&self) -> Vec<Trigger> {
		self.triggers.clone()
	}

	fn validate(&self) -> Result<(), RepositoryError> {
		let mut invalid = 0;
		for (index, trigger) in self.triggers.iter().enumerate() {
			if let Err(e) = trigger.validate() {
				invalid += 1;
				tracing::error!(
					index,
					script_path = %trigger.script_path,
					kind = ?trigger.trigger_type(),
					"Invalid trigger: {}",
					e
				);
			}
		}

		if invalid > 0 {
			return Err(RepositoryError::validation_error(
				format!("{} of {} triggers are invalid", invalid, self.triggers.len()),
				None,
				Some(HashMap::from([(
					"path".to_string(),
					self.path.display().to_string(),
				)])),
			));
		}

		tracing::info!(
			count = self.triggers.len(),
			"All triggers in {} are valid",
			self.path.display()
		);
		Ok(())
	}
}
