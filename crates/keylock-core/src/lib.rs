//! Core types for the Keylock door-lock controller.
//!
//! This crate defines the data model shared by every other Keylock crate:
//! keypad keys and key events, the bounded PIN entry buffer, validated
//! credential strings with constant-time comparison, and the constants
//! that fix the controller's timing and display behaviour.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
