//! Process-backed script launcher.
//!
//! Scripts are started through the interpreter matching their extension and are
//! not awaited by the caller. A background task reaps each child and logs its
//! exit status.

use crate::{models::ScriptLanguage, services::launcher::error::ScriptError};
use std::{collections::HashMap, path::Path, process::Stdio};
use tokio::process::Command;

/// Starts a script with positional arguments.
///
/// Implementors must return as soon as the script has been started; the outcome
/// of the script itself is never reported back.
pub trait ScriptLauncher: Send + Sync {
	/// Launches `script_path` with `args`, one argv element per value.
	fn launch(&self, script_path: &str, args: &[String]) -> Result<(), ScriptError>;
}

/// Launches scripts as child processes of the daemon.
#[derive(Debug, Default, Clone)]
pub struct ProcessScriptLauncher;

impl ProcessScriptLauncher {
	pub fn new() -> Self {
		Self
	}
}

/// Builds the interpreter command for a script.
pub(crate) fn build_command(language: ScriptLanguage, script_path: &str, args: &[String]) -> Command {
	let mut cmd = match language {
		ScriptLanguage::PowerShell => {
			let mut cmd = Command::new("pwsh");
			cmd.args(["-NoProfile", "-ExecutionPolicy", "Bypass", "-File"]);
			cmd
		}
		ScriptLanguage::Bash => Command::new("sh"),
		ScriptLanguage::Python => Command::new("python3"),
		ScriptLanguage::JavaScript => Command::new("node"),
	};

	cmd.arg(script_path)
		.args(args)
		.stdin(Stdio::null())
		.stdout(Stdio::inherit())
		.stderr(Stdio::inherit())
		.kill_on_drop(false);
	cmd
}

impl ScriptLauncher for ProcessScriptLauncher {
	fn launch(&self, script_path: &str, args: &[String]) -> Result<(), ScriptError> {
		let metadata = || {
			Some(HashMap::from([(
				"script_path".to_string(),
				script_path.to_string(),
			)]))
		};

		let path = Path::new(script_path);
		if !path.is_file() {
			return Err(ScriptError::not_found(
				format!("Script file not found: {}", script_path),
				None,
				metadata(),
			));
		}

		let language = ScriptLanguage::from_path(path).ok_or_else(|| {
			ScriptError::unsupported_kind(
				format!("No interpreter for script: {}", script_path),
				None,
				metadata(),
			)
		})?;

		let mut child = build_command(language, script_path, args)
			.spawn()
			.map_err(|e| {
				ScriptError::execution_error(
					format!("Failed to spawn {:?} script", language),
					Some(Box::new(e)),
					metadata(),
				)
			})?;

		tracing::info!(script_path, ?args, pid = ?child.id(), "Launched script");

		let script_path = script_path.to_string();
		tokio::spawn(async move {
			match child.wait().await {
				Ok(status) => tracing::debug!(%script_path, %status, "Script exited"),
				Err(e) => tracing::debug!(%script_path, error = %e, "Failed to wait on script"),
			}
		});

		Ok(())
	}
}
