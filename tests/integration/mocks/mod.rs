//! Mock implementations for testing purposes.
//!
//! - Script launcher
//! - Trigger repository
//!
//! The mocks are implemented using the `mockall` crate.

#[allow(unused_imports)]
pub use repositories::*;
#[allow(unused_imports)]
pub use services::*;
