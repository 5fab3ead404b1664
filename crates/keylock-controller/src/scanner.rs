//! Matrix keypad scanner task.
//!
//! Sweeps the key matrix column by column, debounces presses, waits for
//! release, and emits exactly one [`KeyEvent`] per physical press into the
//! bounded event channel shared with the controller task.
//!
//! # Backpressure
//!
//! The channel holds [`EVENT_QUEUE_CAPACITY`] events. While the controller
//! is inside a blocking feedback sequence (unlock cycle, message hold),
//! presses accumulate in the channel; once it is full the scanner itself
//! blocks on the send. Keys pressed during that window are therefore
//! delivered late rather than dropped.

use crate::error::{ControllerError, Result};
use keylock_core::constants::{
    DEBOUNCE_INTERVAL_MS, MATRIX_COLS, MATRIX_ROWS, RELEASE_POLL_INTERVAL_MS, SCAN_INTERVAL_MS,
};
use keylock_core::types::{Key, KeyEvent};
use keylock_hardware::traits::MatrixPort;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Physical key legend, indexed as `KEY_LAYOUT[row][col]`.
pub const KEY_LAYOUT: [[Key; MATRIX_COLS]; MATRIX_ROWS] = [
    [Key::Digit(1), Key::Digit(2), Key::Digit(3), Key::A],
    [Key::Digit(4), Key::Digit(5), Key::Digit(6), Key::B],
    [Key::Digit(7), Key::Digit(8), Key::Digit(9), Key::Cancel],
    [Key::Delete, Key::Digit(0), Key::Confirm, Key::D],
];

/// Matrix position of a key under [`KEY_LAYOUT`], if present.
///
/// Mostly useful for tests that drive a mock matrix by key rather than
/// by coordinates.
pub fn key_position(key: Key) -> Option<(usize, usize)> {
    (0..MATRIX_ROWS).find_map(|row| {
        (0..MATRIX_COLS)
            .find(|&col| KEY_LAYOUT[row][col] == key)
            .map(|col| (row, col))
    })
}

/// Scanner pacing configuration.
#[derive(Debug, Clone)]
pub struct ScanTiming {
    /// Settle time between first active read and the confirming re-read.
    pub debounce: Duration,

    /// Poll interval while waiting for a confirmed key to be released.
    pub release_poll: Duration,

    /// Sleep between full matrix sweeps.
    pub scan_interval: Duration,
}

impl Default for ScanTiming {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEBOUNCE_INTERVAL_MS),
            release_poll: Duration::from_millis(RELEASE_POLL_INTERVAL_MS),
            scan_interval: Duration::from_millis(SCAN_INTERVAL_MS),
        }
    }
}

/// The matrix scanner task.
///
/// Owns the matrix port exclusively; nothing else touches the drive or
/// sense lines while the scanner runs.
#[derive(Debug)]
pub struct KeyMatrixScanner<M: MatrixPort> {
    port: M,
    timing: ScanTiming,
    events: mpsc::Sender<KeyEvent>,
}

impl<M: MatrixPort> KeyMatrixScanner<M> {
    /// Create a scanner with default pacing.
    pub fn new(port: M, events: mpsc::Sender<KeyEvent>) -> Self {
        Self::with_timing(port, events, ScanTiming::default())
    }

    /// Create a scanner with custom pacing.
    pub fn with_timing(port: M, events: mpsc::Sender<KeyEvent>, timing: ScanTiming) -> Self {
        Self {
            port,
            timing,
            events,
        }
    }

    /// Run the scan loop until the event channel closes.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::ChannelClosed`] when the controller
    /// side of the event channel has gone away.
    pub async fn run(mut self) -> Result<()> {
        loop {
            self.sweep().await?;
            sleep(self.timing.scan_interval).await;
        }
    }

    /// One full pass over the matrix.
    ///
    /// Drives each column in turn and samples every row. An active row is
    /// re-read after the debounce interval; transients shorter than that
    /// are rejected. A confirmed press is emitted only after the key is
    /// released, so holding a key produces a single event.
    async fn sweep(&mut self) -> Result<()> {
        for col in 0..MATRIX_COLS {
            self.port.drive_column(col, true);

            for row in 0..MATRIX_ROWS {
                if !self.port.row_active(row) {
                    continue;
                }

                sleep(self.timing.debounce).await;
                if !self.port.row_active(row) {
                    // Bounce or noise, not a press.
                    continue;
                }

                let key = KEY_LAYOUT[row][col];
                debug!(%key, row, col, "Key press confirmed");

                while self.port.row_active(row) {
                    sleep(self.timing.release_poll).await;
                }

                self.emit(KeyEvent::press(key)).await?;
            }

            self.port.drive_column(col, false);
        }

        Ok(())
    }

    async fn emit(&self, event: KeyEvent) -> Result<()> {
        match self.events.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(event)) => {
                warn!(key = %event.key, "Event queue full, waiting for controller to drain");
                self.events
                    .send(event)
                    .await
                    .map_err(|_| ControllerError::ChannelClosed("key event queue"))
            }
            Err(TrySendError::Closed(_)) => {
                Err(ControllerError::ChannelClosed("key event queue"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keylock_core::constants::EVENT_QUEUE_CAPACITY;
    use keylock_hardware::mock::MockMatrix;
    use rstest::rstest;

    #[rstest]
    #[case(Key::Digit(1), (0, 0))]
    #[case(Key::Digit(5), (1, 1))]
    #[case(Key::Digit(0), (3, 1))]
    #[case(Key::A, (0, 3))]
    #[case(Key::Cancel, (2, 3))]
    #[case(Key::Delete, (3, 0))]
    #[case(Key::Confirm, (3, 2))]
    fn test_key_position(#[case] key: Key, #[case] expected: (usize, usize)) {
        assert_eq!(key_position(key), Some(expected));
    }

    #[test]
    fn test_layout_covers_all_sixteen_keys() {
        let mut seen = std::collections::HashSet::new();
        for row in KEY_LAYOUT {
            for key in row {
                assert!(seen.insert(key), "Duplicate key {key} in layout");
            }
        }
        assert_eq!(seen.len(), MATRIX_ROWS * MATRIX_COLS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_tap_emits_one_event() {
        let (matrix, handle) = MockMatrix::new();
        let (tx, mut rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        tokio::spawn(KeyMatrixScanner::new(matrix, tx).run());

        let (row, col) = key_position(Key::Digit(5)).unwrap();
        handle.tap(row, col).await;

        let event = rx.recv().await.unwrap();
        assert_eq!(event.key, Key::Digit(5));
        assert!(event.pressed);

        // No repeat events from the single press.
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_held_key_emits_once_on_release() {
        let (matrix, handle) = MockMatrix::new();
        let (tx, mut rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        tokio::spawn(KeyMatrixScanner::new(matrix, tx).run());

        let (row, col) = key_position(Key::Confirm).unwrap();
        handle.hold(row, col);

        // Hold across many sweep periods; nothing is emitted while held.
        sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());

        handle.release(row, col);
        sleep(Duration::from_millis(100)).await;

        let event = rx.recv().await.unwrap();
        assert_eq!(event.key, Key::Confirm);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sub_debounce_glitch_emits_nothing() {
        let (matrix, handle) = MockMatrix::new();
        let (tx, mut rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        tokio::spawn(KeyMatrixScanner::new(matrix, tx).run());

        // A 5 ms transient, well under the 20 ms debounce interval.
        let (row, col) = key_position(Key::Digit(8)).unwrap();
        handle.hold(row, col);
        sleep(Duration::from_millis(5)).await;
        handle.release(row, col);

        sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequence_preserves_order() {
        let (matrix, handle) = MockMatrix::new();
        let (tx, mut rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        tokio::spawn(KeyMatrixScanner::new(matrix, tx).run());

        for key in [Key::Digit(1), Key::Digit(2), Key::Digit(3), Key::Confirm] {
            let (row, col) = key_position(key).unwrap();
            handle.tap(row, col).await;
        }

        for expected in [Key::Digit(1), Key::Digit(2), Key::Digit(3), Key::Confirm] {
            let event = rx.recv().await.unwrap();
            assert_eq!(event.key, expected);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_queue_while_receiver_is_busy() {
        let (matrix, handle) = MockMatrix::new();
        let (tx, mut rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        tokio::spawn(KeyMatrixScanner::new(matrix, tx).run());

        // Nobody reads while these are typed, as during a feedback hold.
        for key in [Key::Digit(7), Key::Digit(8), Key::Digit(9)] {
            let (row, col) = key_position(key).unwrap();
            handle.tap(row, col).await;
        }

        // Drain afterwards; everything arrives in press order.
        for expected in [Key::Digit(7), Key::Digit(8), Key::Digit(9)] {
            let event = rx.recv().await.unwrap();
            assert_eq!(event.key, expected);
        }
    }
}
