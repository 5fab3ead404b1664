//! Hardware device trait definitions.
//!
//! These traits establish the contract between the controller tasks and the
//! peripherals (key matrix, character display, lock actuator), enabling easy
//! substitution between mock and real hardware implementations.
//!
//! The display and actuator methods are desugared `async fn`s returning
//! `impl Future + Send`; no `async_trait` macro is needed, and the `Send`
//! bound keeps the controller future spawnable from callers that are
//! generic over the device types. Implementations write plain `async fn`.

use crate::error::Result;
use crate::types::IndicatorChannel;
use std::future::Future;

/// Raw access to the key matrix lines.
///
/// A key matrix is wired as column drive lines crossed with row sense
/// lines; a pressed key connects its column to its row. This trait exposes
/// exactly that electrical picture and nothing more: the scanner task owns
/// all policy (which column is active when, debouncing, release detection).
///
/// Line access is synchronous because GPIO reads and writes complete
/// immediately; there is nothing to await.
pub trait MatrixPort: Send {
    /// Drive a column line active or inactive.
    ///
    /// Column indices outside the matrix geometry are ignored.
    fn drive_column(&mut self, col: usize, active: bool);

    /// Sample a row sense line.
    ///
    /// Returns `true` when the row reads active, which happens when some
    /// key on a currently-driven column in that row is closed. Rows
    /// outside the matrix geometry read inactive.
    fn row_active(&self, row: usize) -> bool;
}

/// Two-line character display abstraction.
///
/// The controller draws complete screens: it clears, then writes each row
/// it needs. Implementations are free to buffer writes, but after the
/// `write_line` future resolves the text must be observable (mock
/// implementations expose it to test handles at that point).
pub trait DisplayDevice: Send {
    /// Clear the display.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is disconnected or a communication
    /// error occurs.
    fn clear(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Write text to a row, starting at column zero.
    ///
    /// Text longer than the display width is truncated by the device.
    ///
    /// # Errors
    ///
    /// Returns an error if the row index is outside the display geometry
    /// or a communication error occurs.
    fn write_line(&mut self, row: u8, text: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Lock actuator and indicator lamp abstraction.
///
/// Drives the physical lock (energised = unlocked) and the per-channel
/// indicator lamps used for grant feedback.
pub trait LockActuator: Send {
    /// Energise or de-energise the lock.
    ///
    /// `locked = false` opens the door; `locked = true` secures it again.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is disconnected or a communication
    /// error occurs.
    fn set_locked(&mut self, locked: bool) -> impl Future<Output = Result<()>> + Send;

    /// Switch an indicator lamp on or off.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is disconnected or a communication
    /// error occurs.
    fn set_indicator(
        &mut self,
        channel: IndicatorChannel,
        on: bool,
    ) -> impl Future<Output = Result<()>> + Send;
}
