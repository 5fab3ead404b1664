//! Mock lock actuator for testing and development.

use crate::error::Result;
use crate::traits::LockActuator;
use crate::types::IndicatorChannel;
use std::sync::{Arc, Mutex, MutexGuard};

/// A single command received by the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCommand {
    /// The lock was energised (`false`) or secured (`true`).
    SetLocked(bool),

    /// An indicator lamp was switched.
    Indicator { channel: IndicatorChannel, on: bool },
}

#[derive(Debug)]
struct ActuatorState {
    locked: bool,
    commands: Vec<ActuatorCommand>,
}

/// Mock lock actuator.
///
/// Starts in the secured state and records every command so tests can
/// assert on actuation sequences (unlock pulses, indicator flash
/// patterns) after the fact.
#[derive(Debug)]
pub struct MockActuator {
    state: Arc<Mutex<ActuatorState>>,
}

impl MockActuator {
    /// Create a new mock actuator in the locked state.
    ///
    /// Returns a tuple of (MockActuator, MockActuatorHandle) where the
    /// handle can be used to observe actuation.
    pub fn new() -> (Self, MockActuatorHandle) {
        let state = Arc::new(Mutex::new(ActuatorState {
            locked: true,
            commands: Vec::new(),
        }));
        let actuator = Self {
            state: Arc::clone(&state),
        };
        let handle = MockActuatorHandle { state };
        (actuator, handle)
    }

    fn lock(&self) -> MutexGuard<'_, ActuatorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl LockActuator for MockActuator {
    async fn set_locked(&mut self, locked: bool) -> Result<()> {
        let mut state = self.lock();
        state.locked = locked;
        state.commands.push(ActuatorCommand::SetLocked(locked));
        Ok(())
    }

    async fn set_indicator(&mut self, channel: IndicatorChannel, on: bool) -> Result<()> {
        self.lock()
            .commands
            .push(ActuatorCommand::Indicator { channel, on });
        Ok(())
    }
}

/// Handle for observing a mock actuator.
///
/// Can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockActuatorHandle {
    state: Arc<Mutex<ActuatorState>>,
}

impl MockActuatorHandle {
    fn lock(&self) -> MutexGuard<'_, ActuatorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current lock state.
    pub fn is_locked(&self) -> bool {
        self.lock().locked
    }

    /// Every command received since creation, in order.
    pub fn commands(&self) -> Vec<ActuatorCommand> {
        self.lock().commands.clone()
    }

    /// Number of times the lock has been energised (unlocked).
    pub fn unlock_count(&self) -> usize {
        self.lock()
            .commands
            .iter()
            .filter(|c| matches!(c, ActuatorCommand::SetLocked(false)))
            .count()
    }

    /// Number of times an indicator lamp was switched on.
    pub fn indicator_pulses(&self, channel: IndicatorChannel) -> usize {
        self.lock()
            .commands
            .iter()
            .filter(|c| matches!(c, ActuatorCommand::Indicator { channel: ch, on: true } if *ch == channel))
            .count()
    }
}
