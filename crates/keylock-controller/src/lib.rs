//! Controller tasks for the Keylock keypad door lock.
//!
//! Two cooperating tasks make up the runtime:
//!
//! 1. The [`KeyMatrixScanner`](scanner::KeyMatrixScanner) sweeps the key
//!    matrix, debounces presses, and emits one [`KeyEvent`] per press
//!    into a bounded channel.
//! 2. The [`LockController`](controller::LockController) consumes those
//!    events, runs them through the pure [`MenuState`](menu::MenuState)
//!    state machine, and executes the resulting effects against the
//!    display, the lock actuator, and the credential store.
//!
//! The channel between them is the system's backpressure boundary: the
//! controller blocks through feedback sequences on purpose, and presses
//! made during one simply queue up (capacity
//! [`EVENT_QUEUE_CAPACITY`](keylock_core::constants::EVENT_QUEUE_CAPACITY))
//! instead of being lost.
//!
//! [`KeyEvent`]: keylock_core::types::KeyEvent

pub mod controller;
pub mod error;
pub mod menu;
pub mod render;
pub mod scanner;

pub use controller::LockController;
pub use error::{ControllerError, Result};
pub use menu::{Effect, MenuState, Mode};
pub use scanner::{KEY_LAYOUT, KeyMatrixScanner, ScanTiming, key_position};
