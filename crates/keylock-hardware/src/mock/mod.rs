//! Mock hardware implementations for testing and development.
//!
//! Each mock is a (device, handle) pair: the device half implements the
//! hardware trait and is owned by the task under test, while the cloneable
//! handle half lets tests drive inputs and observe outputs. State is shared
//! through a mutex, so handles see every operation the moment the device
//! future resolves.

mod actuator;
mod display;
mod matrix;

pub use actuator::{ActuatorCommand, MockActuator, MockActuatorHandle};
pub use display::{DisplayOp, MockDisplay, MockDisplayHandle};
pub use matrix::{MockMatrix, MockMatrixHandle};
