//! Mock character display for testing and development.

use crate::error::{HardwareError, Result};
use crate::traits::DisplayDevice;
use keylock_core::constants::{DISPLAY_COLUMNS, DISPLAY_ROWS};
use std::sync::{Arc, Mutex, MutexGuard};

/// A single operation performed on the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayOp {
    /// The display was cleared.
    Clear,

    /// Text was written to a row. Holds the text as requested, before
    /// any width truncation.
    Write { row: u8, text: String },
}

#[derive(Debug, Default)]
struct DisplayState {
    /// Current visible content per row, truncated to the display width.
    lines: [String; DISPLAY_ROWS as usize],

    /// Every operation since creation, in order.
    ops: Vec<DisplayOp>,
}

/// Mock two-line character display.
///
/// Records every operation and maintains the currently visible frame so
/// tests can assert on both the final screen and the sequence of draws
/// that produced it.
///
/// # Examples
///
/// ```
/// use keylock_hardware::mock::MockDisplay;
/// use keylock_hardware::traits::DisplayDevice;
///
/// #[tokio::main]
/// async fn main() -> keylock_hardware::Result<()> {
///     let (mut display, handle) = MockDisplay::new();
///
///     display.write_line(0, "  Enter Password:").await?;
///     display.write_line(1, "***").await?;
///
///     assert!(handle.visible("Enter Password"));
///     assert_eq!(handle.line(1), "***");
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockDisplay {
    state: Arc<Mutex<DisplayState>>,
}

impl MockDisplay {
    /// Create a new mock display with an empty frame.
    ///
    /// Returns a tuple of (MockDisplay, MockDisplayHandle) where the
    /// handle can be used to observe what is on screen.
    pub fn new() -> (Self, MockDisplayHandle) {
        let state = Arc::new(Mutex::new(DisplayState::default()));
        let display = Self {
            state: Arc::clone(&state),
        };
        let handle = MockDisplayHandle { state };
        (display, handle)
    }

    fn lock(&self) -> MutexGuard<'_, DisplayState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DisplayDevice for MockDisplay {
    async fn clear(&mut self) -> Result<()> {
        let mut state = self.lock();
        state.lines = Default::default();
        state.ops.push(DisplayOp::Clear);
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
        let mut state = self.lock();
        let visible: String = text.chars().take(DISPLAY_COLUMNS as usize).collect();
        state.lines[row as usize] = visible;
        state.ops.push(DisplayOp::Write {
            row,
            text: text.to_string(),
        });
        Ok(())
    }
}

/// Handle for observing a mock display.
///
/// Can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockDisplayHandle {
    state: Arc<Mutex<DisplayState>>,
}

impl MockDisplayHandle {
    fn lock(&self) -> MutexGuard<'_, DisplayState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The currently visible frame, one string per row.
    pub fn lines(&self) -> [String; DISPLAY_ROWS as usize] {
        self.lock().lines.clone()
    }

    /// The currently visible content of one row.
    ///
    /// Rows outside the display geometry read empty.
    pub fn line(&self, row: u8) -> String {
        if row >= DISPLAY_ROWS {
            return String::new();
        }
        self.lock().lines[row as usize].clone()
    }

    /// Check whether any visible row contains the given text.
    pub fn visible(&self, text: &str) -> bool {
        self.lock().lines.iter().any(|line| line.contains(text))
    }

    /// Every operation performed since creation (or the last
    /// [`clear_ops`](Self::clear_ops)), in order.
    pub fn ops(&self) -> Vec<DisplayOp> {
        self.lock().ops.clone()
    }

    /// Every write in operation order, ignoring clears. Useful for
    /// asserting that a transient message appeared even after the screen
    /// has moved on.
    pub fn writes(&self) -> Vec<String> {
        self.lock()
            .ops
            .iter()
            .filter_map(|op| match op {
                DisplayOp::Write { text, .. } => Some(text.clone()),
                DisplayOp::Clear => None,
            })
            .collect()
    }

    /// Check whether any write so far contained the given text.
    pub fn ever_wrote(&self, text: &str) -> bool {
        self.writes().iter().any(|line| line.contains(text))
    }

    /// Forget the recorded operation log. The visible frame is kept.
    pub fn clear_ops(&self) {
        self.lock().ops.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_and_observe() {
        let (mut display, handle) = MockDisplay::new();

        display.write_line(0, "  Settings Menu").await.unwrap();
        display.write_line(1, "A:Master B:Guest C:Back").await.unwrap();

        assert_eq!(handle.line(0), "  Settings Menu");
        assert!(handle.visible("Settings"));
    }

    #[tokio::test]
    async fn test_width_truncation() {
        let (mut display, handle) = MockDisplay::new();

        display.write_line(1, "A:Master B:Guest C:Back").await.unwrap();

        // Visible frame is cut at the display width, the op log keeps
        // the full requested text.
        assert_eq!(handle.line(1), "A:Master B:Guest");
        assert!(handle.ever_wrote("C:Back"));
    }

    #[tokio::test]
    async fn test_clear_resets_frame() {
        let (mut display, handle) = MockDisplay::new();

        display.write_line(0, "hello").await.unwrap();
        display.clear().await.unwrap();

        assert_eq!(handle.line(0), "");
        assert_eq!(
            handle.ops(),
            vec![
                DisplayOp::Write {
                    row: 0,
                    text: "hello".to_string()
                },
                DisplayOp::Clear,
            ]
        );
    }

    #[tokio::test]
    async fn test_row_out_of_range() {
        let (mut display, _handle) = MockDisplay::new();

        let result = display.write_line(2, "nope").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_ever_wrote_survives_redraw() {
        let (mut display, handle) = MockDisplay::new();

        display.write_line(0, "  Access Granted!").await.unwrap();
        display.clear().await.unwrap();
        display.write_line(0, "  1: Unlock").await.unwrap();

        assert!(!handle.visible("Access Granted"));
        assert!(handle.ever_wrote("Access Granted"));
    }
}
