//! The controller task: consumes key events, drives the peripherals.
//!
//! The controller owns the display, the lock actuator, and the credential
//! store. Each key event is fed to the pure [`MenuState`] machine, whose
//! returned [`Effect`]s are executed here in order. Feedback sequences
//! (message holds, indicator flashes, the unlock window) are deliberately
//! blocking: while one runs, further presses queue up in the bounded
//! event channel and are handled afterwards.

use crate::error::Result;
use crate::menu::{Effect, MenuState};
use crate::render::screen;
use keylock_core::constants::{INDICATOR_BLINK_CYCLES, INDICATOR_BLINK_MS, UNLOCK_DURATION_MS};
use keylock_core::types::KeyEvent;
use keylock_hardware::traits::{DisplayDevice, LockActuator};
use keylock_store::{CredentialSet, CredentialStore};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info};

/// The door-lock controller task.
pub struct LockController<D, A, S> {
    display: D,
    actuator: A,
    store: S,
    state: MenuState,
    events: mpsc::Receiver<KeyEvent>,
}

impl<D, A, S> LockController<D, A, S>
where
    D: DisplayDevice,
    A: LockActuator,
    S: CredentialStore,
{
    /// Build a controller, loading (and if necessary repairing) the
    /// persisted credential snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the first-boot
    /// snapshot cannot be written.
    pub async fn new(
        display: D,
        actuator: A,
        mut store: S,
        events: mpsc::Receiver<KeyEvent>,
    ) -> Result<Self> {
        let credentials = CredentialSet::load(&mut store).await?;
        info!(guest_used = credentials.guest_used, "Credential snapshot loaded");

        Ok(Self {
            display,
            actuator,
            store,
            state: MenuState::new(credentials),
            events,
        })
    }

    /// Run until the key event channel closes.
    ///
    /// # Errors
    ///
    /// Returns an error if a peripheral fails or a persist cannot be
    /// completed; the task does not continue past either, since running
    /// with unpersisted credential state would let a single-use grant
    /// recur after a power cycle.
    pub async fn run(mut self) -> Result<()> {
        self.draw_screen().await?;

        while let Some(event) = self.events.recv().await {
            if !event.pressed {
                continue;
            }

            debug!(key = %event.key, mode = %self.state.mode(), "Handling key press");
            let effects = self.state.handle_key(event.key);
            for effect in effects {
                self.apply(effect).await?;
            }
            self.draw_screen().await?;
        }

        info!("Key event channel closed, controller stopping");
        Ok(())
    }

    async fn apply(&mut self, effect: Effect) -> Result<()> {
        match effect {
            Effect::ShowMessage { text, hold } => {
                debug!(text, hold_ms = hold.as_millis() as u64, "Showing message");
                self.display.clear().await?;
                self.display.write_line(0, text).await?;
                sleep(hold).await;
            }
            Effect::FlashIndicator(channel) => {
                for _ in 0..INDICATOR_BLINK_CYCLES {
                    self.actuator.set_indicator(channel, true).await?;
                    sleep(Duration::from_millis(INDICATOR_BLINK_MS)).await;
                    self.actuator.set_indicator(channel, false).await?;
                    sleep(Duration::from_millis(INDICATOR_BLINK_MS)).await;
                }
            }
            Effect::CycleLock => {
                info!("Access granted, energising lock");
                self.actuator.set_locked(false).await?;
                sleep(Duration::from_millis(UNLOCK_DURATION_MS)).await;
                self.actuator.set_locked(true).await?;
                info!("Lock secured");
            }
            Effect::Persist => {
                self.state.credentials().persist(&mut self.store).await?;
                debug!("Credential snapshot persisted");
            }
        }
        Ok(())
    }

    async fn draw_screen(&mut self) -> Result<()> {
        let (row0, row1) = screen(self.state.mode(), self.state.buffer());
        self.display.clear().await?;
        self.display.write_line(0, row0).await?;
        self.display.write_line(1, &row1).await?;
        Ok(())
    }
}
