//! Hardware abstraction layer for the Keylock door-lock controller.
//!
//! This crate defines the trait seams between the controller logic and the
//! physical peripherals: the raw key matrix, the two-line character display,
//! and the lock actuator with its indicator lamps. Mock implementations are
//! provided for development and testing without physical hardware.
//!
//! # Design
//!
//! - **Matrix access is synchronous.** [`MatrixPort`](traits::MatrixPort)
//!   models GPIO line reads and writes, which complete immediately; the
//!   scanning *policy* (debounce, release wait, sweep pacing) lives in the
//!   scanner task, not here.
//! - **Output devices are async.** [`DisplayDevice`](traits::DisplayDevice)
//!   and [`LockActuator`](traits::LockActuator) declare their methods as
//!   `impl Future + Send` (desugared `async fn`), so real implementations
//!   can sit behind serial links or I2C expanders without blocking the
//!   runtime, and the controller future stays spawnable behind generics.
//! - **Mocks are (device, handle) pairs.** The device half is owned by the
//!   task under test; the cloneable handle half lets the test drive key
//!   presses and observe display frames and actuator commands.
//!
//! These traits are not object-safe (the methods return opaque futures);
//! use generic type parameters as the controller does.

pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

pub use error::{HardwareError, Result};
pub use traits::{DisplayDevice, LockActuator, MatrixPort};
pub use types::IndicatorChannel;
