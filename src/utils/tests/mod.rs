//! Test helper utilities
//!
//! - `builders`: Builders for test instances of models
//! - `launcher`: A script launcher that records calls instead of spawning processes

pub mod builders {
	pub mod trigger;
}


pub use builders::trigger::TriggerBuilder;
pub use launcher::RecordingLauncher;
