//! Mock key matrix for testing and development.

use crate::traits::MatrixPort;
use keylock_core::constants::{MATRIX_COLS, MATRIX_ROWS};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// How long a simulated tap stays closed before release.
///
/// Long enough to survive the scanner's debounce re-read; intended for use
/// with a paused tokio clock where the sleep is virtual.
const TAP_HOLD: Duration = Duration::from_millis(80);

/// Settle time after a simulated release.
const TAP_SETTLE: Duration = Duration::from_millis(80);

#[derive(Debug, Default)]
struct MatrixState {
    /// Column drive lines, as last set by the scanner.
    driven: [bool; MATRIX_COLS],

    /// Key switch states: `closed[row][col]` is true while that key is
    /// physically held.
    closed: [[bool; MATRIX_COLS]; MATRIX_ROWS],
}

/// Mock key matrix for testing and development.
///
/// Simulates the electrical behaviour of a wired key matrix: a row sense
/// line reads active exactly when some held key sits on a currently-driven
/// column. Key presses are injected through a [`MockMatrixHandle`].
///
/// # Examples
///
/// ```
/// use keylock_hardware::mock::MockMatrix;
/// use keylock_hardware::traits::MatrixPort;
///
/// let (mut matrix, handle) = MockMatrix::new();
///
/// handle.hold(1, 2);
/// matrix.drive_column(2, true);
/// assert!(matrix.row_active(1));
///
/// matrix.drive_column(2, false);
/// assert!(!matrix.row_active(1));
/// ```
#[derive(Debug)]
pub struct MockMatrix {
    state: Arc<Mutex<MatrixState>>,
}

impl MockMatrix {
    /// Create a new mock matrix with all keys released.
    ///
    /// Returns a tuple of (MockMatrix, MockMatrixHandle) where the handle
    /// can be used to simulate key presses.
    pub fn new() -> (Self, MockMatrixHandle) {
        let state = Arc::new(Mutex::new(MatrixState::default()));
        let matrix = Self {
            state: Arc::clone(&state),
        };
        let handle = MockMatrixHandle { state };
        (matrix, handle)
    }

    fn lock(&self) -> MutexGuard<'_, MatrixState> {
        // A poisoned mutex only means a test panicked while holding it;
        // the plain-old-data state is still usable.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl MatrixPort for MockMatrix {
    fn drive_column(&mut self, col: usize, active: bool) {
        if col >= MATRIX_COLS {
            return;
        }
        self.lock().driven[col] = active;
    }

    fn row_active(&self, row: usize) -> bool {
        if row >= MATRIX_ROWS {
            return false;
        }
        let state = self.lock();
        (0..MATRIX_COLS).any(|col| state.driven[col] && state.closed[row][col])
    }
}

/// Handle for driving a mock key matrix.
///
/// Can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockMatrixHandle {
    state: Arc<Mutex<MatrixState>>,
}

impl MockMatrixHandle {
    fn lock(&self) -> MutexGuard<'_, MatrixState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Close the key switch at the given position.
    ///
    /// Positions outside the matrix geometry are ignored.
    pub fn hold(&self, row: usize, col: usize) {
        if row >= MATRIX_ROWS || col >= MATRIX_COLS {
            return;
        }
        self.lock().closed[row][col] = true;
    }

    /// Open the key switch at the given position.
    pub fn release(&self, row: usize, col: usize) {
        if row >= MATRIX_ROWS || col >= MATRIX_COLS {
            return;
        }
        self.lock().closed[row][col] = false;
    }

    /// Open every key switch.
    pub fn release_all(&self) {
        let mut state = self.lock();
        state.closed = [[false; MATRIX_COLS]; MATRIX_ROWS];
    }

    /// Check whether a key switch is currently closed.
    pub fn is_held(&self, row: usize, col: usize) -> bool {
        if row >= MATRIX_ROWS || col >= MATRIX_COLS {
            return false;
        }
        self.lock().closed[row][col]
    }

    /// Simulate a complete press-and-release of one key.
    ///
    /// Holds the key long enough for a scanner sweep to debounce it, then
    /// releases and lets the release propagate. The sleeps are virtual
    /// under `#[tokio::test(start_paused = true)]`, which is how the
    /// scanner tests drive this.
    pub async fn tap(&self, row: usize, col: usize) {
        self.hold(row, col);
        tokio::time::sleep(TAP_HOLD).await;
        self.release(row, col);
        tokio::time::sleep(TAP_SETTLE).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_row_inactive_without_drive() {
        let (matrix, handle) = MockMatrix::new();

        handle.hold(0, 0);
        assert!(!matrix.row_active(0));
    }

    #[test]
    fn test_row_active_on_driven_column() {
        let (mut matrix, handle) = MockMatrix::new();

        handle.hold(2, 3);
        matrix.drive_column(3, true);

        assert!(matrix.row_active(2));
        assert!(!matrix.row_active(0));

        matrix.drive_column(3, false);
        assert!(!matrix.row_active(2));
    }

    #[test]
    fn test_release_clears_row() {
        let (mut matrix, handle) = MockMatrix::new();

        handle.hold(1, 1);
        matrix.drive_column(1, true);
        assert!(matrix.row_active(1));

        handle.release(1, 1);
        assert!(!matrix.row_active(1));
    }

    #[test]
    fn test_release_all() {
        let (mut matrix, handle) = MockMatrix::new();

        handle.hold(0, 0);
        handle.hold(3, 3);
        matrix.drive_column(0, true);
        matrix.drive_column(3, true);

        handle.release_all();
        assert!(!matrix.row_active(0));
        assert!(!matrix.row_active(3));
    }

    #[rstest]
    #[case(4, 0)]
    #[case(0, 4)]
    #[case(9, 9)]
    fn test_out_of_range_positions_ignored(#[case] row: usize, #[case] col: usize) {
        let (mut matrix, handle) = MockMatrix::new();

        handle.hold(row, col);
        matrix.drive_column(col, true);
        assert!(!matrix.row_active(row));
        assert!(!handle.is_held(row, col));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tap_closes_then_opens() {
        let (_matrix, handle) = MockMatrix::new();

        let watcher = handle.clone();
        let tap = tokio::spawn(async move { watcher.tap(2, 1).await });

        // Yield so the tap task runs its hold before we sample.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(handle.is_held(2, 1));

        tap.await.unwrap();
        assert!(!handle.is_held(2, 1));
    }
}
