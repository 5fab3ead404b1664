//! Timing, capacity, and display constants for the Keylock controller.
//!
//! These values fix the observable behaviour of the system: how the
//! matrix is scanned, how long the lock stays energised, how feedback is
//! paced, and what the two-line character display shows in each menu
//! mode. Changing the timing constants changes the backpressure
//! behaviour of the event channel (see `keylock-controller`), so they
//! are centralised here rather than scattered across the tasks.

// ============================================================================
// Matrix geometry
// ============================================================================

/// Number of rows in the key matrix.
pub const MATRIX_ROWS: usize = 4;

/// Number of columns in the key matrix.
pub const MATRIX_COLS: usize = 4;

// ============================================================================
// Scanner timing
// ============================================================================

/// Debounce interval in milliseconds.
///
/// After the first active read of a row line, the scanner waits this
/// long and re-reads before accepting the press as real. Transients
/// shorter than this interval are rejected.
pub const DEBOUNCE_INTERVAL_MS: u64 = 20;

/// Poll interval while waiting for a confirmed key to be released.
///
/// A confirmed press is not emitted until the row line returns inactive,
/// which guarantees exactly one event per physical press regardless of
/// hold duration.
pub const RELEASE_POLL_INTERVAL_MS: u64 = 10;

/// Sleep between full matrix sweeps.
pub const SCAN_INTERVAL_MS: u64 = 30;

// ============================================================================
// Actuation and feedback timing
// ============================================================================

/// How long the lock stays energised (unlocked) after a grant.
pub const UNLOCK_DURATION_MS: u64 = 3000;

/// Duration of each indicator on or off phase during a grant flash.
pub const INDICATOR_BLINK_MS: u64 = 200;

/// Number of on/off cycles in a grant flash sequence.
pub const INDICATOR_BLINK_CYCLES: u32 = 3;

/// How long transient feedback messages stay on the display.
pub const MESSAGE_HOLD_MS: u64 = 2000;

/// How long the "enter new code" prompt stays up after a successful
/// master verification, before the change-mode screen is drawn.
pub const PROMPT_HOLD_MS: u64 = 1000;

// ============================================================================
// Event channel
// ============================================================================

/// Capacity of the bounded scanner-to-controller event queue.
///
/// When the controller is inside a blocking feedback sequence, up to
/// this many presses are queued; beyond that the scanner blocks until
/// the controller drains the queue.
pub const EVENT_QUEUE_CAPACITY: usize = 10;

// ============================================================================
// Credential policy
// ============================================================================

/// Maximum credential and PIN-entry length in digits.
pub const MAX_CODE_LENGTH: usize = 5;

/// Minimum length of any stored credential.
pub const MIN_CODE_LENGTH: usize = 1;

/// Minimum length accepted when *changing* a credential.
///
/// Shorter replacements are rejected and the stored credential is left
/// unchanged. Factory defaults are 4 digits for the same reason.
pub const MIN_REPLACEMENT_LENGTH: usize = 4;

/// Factory default master code, installed on first run.
pub const DEFAULT_MASTER_CODE: &str = "1234";

/// Factory default guest code, installed on first run.
pub const DEFAULT_GUEST_CODE: &str = "5678";

// ============================================================================
// Credential store keys
// ============================================================================

/// Store key for the master credential.
pub const KEY_MASTER_CODE: &str = "master_code";

/// Store key for the guest credential.
pub const KEY_GUEST_CODE: &str = "guest_code";

/// Store key for the guest-used flag (single byte, 0 or 1).
pub const KEY_GUEST_USED: &str = "guest_used";

// ============================================================================
// Display configuration
// ============================================================================

/// Columns on the character display.
pub const DISPLAY_COLUMNS: u8 = 16;

/// Rows on the character display.
pub const DISPLAY_ROWS: u8 = 2;

/// Mask character rendered once per buffered PIN digit.
pub const MASK_CHAR: char = '*';

// ============================================================================
// Menu labels (row 0 / row 1 per mode)
// ============================================================================

pub const LABEL_MAIN_MENU: &str = "  1: Unlock";
pub const LABEL_MAIN_MENU_HINT: &str = "2: Settings 3:Exit";
pub const LABEL_UNLOCK_ENTRY: &str = "  Enter Password:";
pub const LABEL_SETTINGS_MENU: &str = "  Settings Menu";
pub const LABEL_SETTINGS_HINT: &str = "A:Master B:Guest C:Back";
pub const LABEL_VERIFY_MASTER: &str = "  Master Password:";
pub const LABEL_CHANGE_MASTER: &str = "  New Master Pass:";
pub const LABEL_CHANGE_GUEST: &str = "  New Guest Pass:";
pub const LABEL_SYSTEM_LOCKED: &str = "  System Locked";

// ============================================================================
// Feedback messages
// ============================================================================

pub const MSG_ACCESS_GRANTED: &str = "  Access Granted!";
pub const MSG_WRONG_PASSWORD: &str = "  Wrong Password!";
pub const MSG_GUEST_PASS_USED: &str = "Guest Pass Used!";
pub const MSG_ENTER_NEW_CODE: &str = "Enter New Pass";
pub const MSG_MASTER_CHANGED: &str = "Master Pass Changed!";
pub const MSG_GUEST_CHANGED: &str = "Guest Pass Changed!";
pub const MSG_MIN_DIGITS: &str = "Min 4 digits!";
pub const MSG_SYSTEM_UNLOCKED: &str = "System Unlocked";
