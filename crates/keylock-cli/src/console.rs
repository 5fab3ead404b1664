//! Console-backed peripheral implementations.
//!
//! Renders the two-line character display as a bordered frame on stdout
//! and reports lock and indicator activity as log lines, so the whole
//! controller can be exercised from a terminal without hardware.

use keylock_core::constants::{DISPLAY_COLUMNS, DISPLAY_ROWS};
use keylock_hardware::traits::{DisplayDevice, LockActuator};
use keylock_hardware::{HardwareError, IndicatorChannel, Result};
use tracing::info;

/// Character display that redraws itself on stdout after every write.
#[derive(Debug, Default)]
pub struct ConsoleDisplay {
    lines: [String; DISPLAY_ROWS as usize],
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    fn redraw(&self) {
        let width = DISPLAY_COLUMNS as usize;
        println!("+{}+", "-".repeat(width));
        for line in &self.lines {
            println!("|{:<width$}|", line, width = width);
        }
        println!("+{}+", "-".repeat(width));
    }
}

impl DisplayDevice for ConsoleDisplay {
    async fn clear(&mut self) -> Result<()> {
        self.lines = Default::default();
        Ok(())
    }

    async fn write_line(&mut self, row: u8, text: &str) -> Result<()> {
        if row >= DISPLAY_ROWS {
            return Err(HardwareError::out_of_range(format!(
                "Row must be 0-{}, got {}",
                DISPLAY_ROWS - 1,
                row
            )));
        }
        self.lines[row as usize] = text.chars().take(DISPLAY_COLUMNS as usize).collect();
        // Redraw only on the last row so each screen prints once.
        if row == DISPLAY_ROWS - 1 {
            self.redraw();
        }
        Ok(())
    }
}

/// Lock actuator that reports actuation as log lines.
#[derive(Debug, Default)]
pub struct ConsoleActuator;

impl ConsoleActuator {
    pub fn new() -> Self {
        Self
    }
}

impl LockActuator for ConsoleActuator {
    async fn set_locked(&mut self, locked: bool) -> Result<()> {
        if locked {
            info!("lock SECURED");
        } else {
            info!("lock OPEN");
        }
        Ok(())
    }

    async fn set_indicator(&mut self, channel: IndicatorChannel, on: bool) -> Result<()> {
        info!(%channel, on, "indicator");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_console_display_rejects_bad_row() {
        let mut display = ConsoleDisplay::new();
        assert!(display.write_line(5, "x").await.is_err());
    }

    #[tokio::test]
    async fn test_console_display_accepts_both_rows() {
        let mut display = ConsoleDisplay::new();
        display.write_line(0, "  1: Unlock").await.unwrap();
        display.write_line(1, "2: Settings 3:Exit").await.unwrap();
    }
}
