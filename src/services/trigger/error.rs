//! Trigger error types and handling.
//!
//! Provides error types for arming and running triggers: bad configuration,
//! filesystem watch failures and launch failures.

use crate::utils::logging::error::{BoxedSource, ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents errors that can occur during trigger operations
#[derive(ThisError, Debug)]
pub enum TriggerError {
	/// The trigger cannot be armed as configured
	#[error("Configuration error: {0}")]
	ConfigurationError(ErrorContext),

	/// The filesystem watcher could not be created or attached
	#[error("Watch error: {0}")]
	WatchError(ErrorContext),

	/// A fired trigger failed to launch its script
	#[error("Execution error: {0}")]
	ExecutionError(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

// Constructors do not log. Arming failures are logged from the reload report,
// launch failures by the handler that fired.
impl TriggerError {
	// Configuration error
	pub fn configuration_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ConfigurationError(ErrorContext::new(msg, source, metadata))
	}

	// Watch error
	pub fn watch_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::WatchError(ErrorContext::new(msg, source, metadata))
	}

	// Execution error
	pub fn execution_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ExecutionError(ErrorContext::new(msg, source, metadata))
	}
}

impl TraceableError for TriggerError {
	fn trace_id(&self) -> String {
		match self {
			Self::ConfigurationError(ctx) => ctx.trace_id.clone(),
			Self::WatchError(ctx) => ctx.trace_id.clone(),
			Self::ExecutionError(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
