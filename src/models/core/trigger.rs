use serde::{Deserialize, Serialize};

/// A script to run together with the event source that fires it.
///
/// The kind-specific payload is flattened next to `script_path`, so a cron
/// trigger reads as
/// `{"script_path": "a.ps1", "kind": "Cron", "cron_expression": "*/5 * * * * *"}`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Trigger {
	/// Path of the script launched when the trigger fires
	pub script_path: String,

	/// Kind tag and kind-specific configuration
	#[serde(flatten)]
	pub config: TriggerTypeConfig,
}

/// Supported trigger kinds
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum TriggerType {
	/// Fires on a cron schedule
	Cron,
	/// Fires on filesystem changes under a directory
	FileWatch,
}

/// Kind-specific configuration, discriminated by the `kind` field
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "kind")]
pub enum TriggerTypeConfig {
	/// Cron schedule configuration
	Cron {
		/// Cron expression with a seconds field (five-field expressions fire at second 0)
		cron_expression: String,
	},
	/// Filesystem watch configuration
	FileWatch {
		/// Root of the watched directory tree
		watched_path: String,
	},
	/// Any `kind` value this daemon does not know how to arm
	#[serde(other)]
	Unknown,
}

impl Trigger {
	pub fn cron(script_path: impl Into<String>, cron_expression: impl Into<String>) -> Self {
		Self {
			script_path: script_path.into(),
			config: TriggerTypeConfig::Cron {
				cron_expression: cron_expression.into(),
			},
		}
	}

	pub fn file_watch(script_path: impl Into<String>, watched_path: impl Into<String>) -> Self {
		Self {
			script_path: script_path.into(),
			config: TriggerTypeConfig::FileWatch {
				watched_path: watched_path.into(),
			},
		}
	}

	/// Returns the kind of this trigger, or `None` for an unknown kind.
	pub fn trigger_type(&self) -> Option<TriggerType> {
		match self.config {
			TriggerTypeConfig::Cron { .. } => Some(TriggerType::Cron),
			TriggerTypeConfig::FileWatch { .. } => Some(TriggerType::FileWatch),
			TriggerTypeConfig::Unknown => None,
		}
	}
}
