//! Script launcher error types and handling.
//!
//! Provides error types for launching scripts: a missing file, an extension the
//! launcher does not know how to run, and a failed process spawn.

use crate::utils::logging::error::{BoxedSource, ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents possible errors while launching a script
#[derive(ThisError, Debug)]
pub enum ScriptError {
	/// The script file does not exist
	#[error("Not found error: {0}")]
	NotFound(ErrorContext),

	/// The script extension does not map to a known interpreter
	#[error("Unsupported kind error: {0}")]
	UnsupportedKind(ErrorContext),

	/// The interpreter process could not be started
	#[error("Execution error: {0}")]
	ExecutionError(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl ScriptError {
	// Not found error
	pub fn not_found(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::NotFound(ErrorContext::new(msg, source, metadata))
	}

	// Unsupported kind error
	pub fn unsupported_kind(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::UnsupportedKind(ErrorContext::new(msg, source, metadata))
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

impl TraceableError for ScriptError {
	fn trace_id(&self) -> String {
		match self {
			Self::NotFound(ctx) => ctx.trace_id.clone(),
			Self::UnsupportedKind(ctx) => ctx.trace_id.clone(),
			Self::ExecutionError(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
