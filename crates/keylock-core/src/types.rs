use crate::{
    Result,
    constants::{MAX_CODE_LENGTH, MIN_CODE_LENGTH},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// A single key on the 4x4 matrix keypad.
///
/// The legend follows the standard telephone layout with a function
/// column: digits `0`-`9`, `A`/`B` (settings shortcuts), `C` (cancel),
/// `D` (unassigned), `*` (delete last digit) and `#` (confirm).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Numeric digit (0-9).
    Digit(u8),

    /// Settings shortcut: change master credential.
    A,

    /// Settings shortcut: change guest credential.
    B,

    /// Cancel key (the `C` cap). Aborts the current entry or submenu.
    Cancel,

    /// Unassigned function key.
    D,

    /// Delete key (`*`). Removes the last buffered digit.
    Delete,

    /// Confirm key (`#`). Submits the current entry.
    Confirm,
}

impl Key {
    /// Create a digit key with validation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDigit`] if the digit is greater than 9.
    pub fn digit(d: u8) -> Result<Self> {
        if d > 9 {
            return Err(Error::InvalidDigit(d));
        }
        Ok(Self::Digit(d))
    }

    /// Map a keypad legend character to a key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] for characters not on the legend.
    pub fn from_char(c: char) -> Result<Self> {
        match c {
            '0'..='9' => Ok(Self::Digit(c as u8 - b'0')),
            'A' => Ok(Self::A),
            'B' => Ok(Self::B),
            'C' => Ok(Self::Cancel),
            'D' => Ok(Self::D),
            '*' => Ok(Self::Delete),
            '#' => Ok(Self::Confirm),
            _ => Err(Error::InvalidKey(c)),
        }
    }

    /// The legend character for this key.
    #[must_use]
    pub fn to_char(self) -> char {
        match self {
            Self::Digit(d) => (b'0' + d) as char,
            Self::A => 'A',
            Self::B => 'B',
            Self::Cancel => 'C',
            Self::D => 'D',
            Self::Delete => '*',
            Self::Confirm => '#',
        }
    }

    /// Check if this key is a digit.
    #[must_use]
    pub fn is_digit(self) -> bool {
        matches!(self, Self::Digit(_))
    }

    /// Get the digit value if this is a digit key.
    #[must_use]
    pub fn as_digit(self) -> Option<u8> {
        match self {
            Self::Digit(d) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A debounced key event emitted by the matrix scanner.
///
/// Exactly one event is produced per physical press-and-release cycle;
/// only the press edge is reported, there are no repeat events while a
/// key is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub key: Key,

    /// Press edge indicator. Always `true` in the current pipeline;
    /// kept so release events can be added without a wire change.
    pub pressed: bool,
}

impl KeyEvent {
    /// Create a press event for the given key.
    #[must_use]
    pub fn press(key: Key) -> Self {
        Self { key, pressed: true }
    }
}

/// Bounded masked PIN entry buffer.
///
/// Holds at most [`MAX_CODE_LENGTH`] digits. Pushing into a full buffer
/// is a silent no-op (the digit is dropped, nothing is overwritten),
/// matching the controller's silent-absorb policy for capacity limits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinBuffer(String);

impl PinBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self(String::with_capacity(MAX_CODE_LENGTH))
    }

    /// Append a digit if there is room.
    ///
    /// Returns `true` if the digit was stored, `false` if the buffer is
    /// already at capacity (the digit is discarded).
    pub fn push(&mut self, digit: u8) -> bool {
        debug_assert!(digit <= 9, "Digit must be 0-9");
        if self.0.len() >= MAX_CODE_LENGTH {
            return false;
        }
        self.0.push((b'0' + digit) as char);
        true
    }

    /// Remove the last digit. Returns `false` if the buffer was empty.
    pub fn pop_digit(&mut self) -> bool {
        self.0.pop().is_some()
    }

    /// Discard all buffered digits.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Number of buffered digits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the buffer holds no digits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check whether the buffer is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.0.len() >= MAX_CODE_LENGTH
    }

    /// The buffered digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A stored access credential (1-5 ASCII digits).
///
/// # Security
///
/// Comparison is constant-time to avoid leaking, through timing, how
/// many leading digits of an attempted entry were correct. Both
/// `PartialEq` and [`Credential::matches`] go through `subtle`.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Credential(String);

impl Credential {
    /// Create a credential with validation.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidCredential` if the code is not 1-5
    /// characters or contains anything other than ASCII digits.
    pub fn new(code: &str) -> Result<Self> {
        let len = code.len();
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&len) {
            return Err(Error::InvalidCredential {
                message: format!(
                    "Code must be {MIN_CODE_LENGTH}-{MAX_CODE_LENGTH} digits, got {len}"
                ),
            });
        }
        if !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidCredential {
                message: "Code must contain only digits 0-9".to_string(),
            });
        }
        Ok(Credential(code.to_string()))
    }

    /// The credential digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of digits in the credential.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A stored credential is never empty; kept for clippy symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Constant-time comparison against an attempted entry.
    ///
    /// Exact-length string equality; a prefix of the credential never
    /// matches.
    #[must_use]
    pub fn matches(&self, entry: &str) -> bool {
        self.0.as_bytes().ct_eq(entry.as_bytes()).into()
    }
}

/// Constant-time comparison implementation for Credential.
impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl std::hash::Hash for Credential {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl std::str::FromStr for Credential {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Credential::new(s)
    }
}

/// Which of the two stored credentials an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    /// The reusable master credential.
    Master,
    /// The single-use guest credential.
    Guest,
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialKind::Master => write!(f, "master"),
            CredentialKind::Guest => write!(f, "guest"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case('0', Key::Digit(0))]
    #[case('9', Key::Digit(9))]
    #[case('A', Key::A)]
    #[case('B', Key::B)]
    #[case('C', Key::Cancel)]
    #[case('D', Key::D)]
    #[case('*', Key::Delete)]
    #[case('#', Key::Confirm)]
    fn test_key_from_char_valid(#[case] c: char, #[case] expected: Key) {
        let key = Key::from_char(c).unwrap();
        assert_eq!(key, expected);
        assert_eq!(key.to_char(), c);
    }

    #[rstest]
    #[case('E')]
    #[case(' ')]
    #[case('x')]
    fn test_key_from_char_invalid(#[case] c: char) {
        assert!(Key::from_char(c).is_err());
    }

    #[test]
    fn test_key_digit_validation() {
        assert_eq!(Key::digit(5).unwrap(), Key::Digit(5));
        assert!(Key::digit(10).is_err());
    }

    #[test]
    fn test_key_digit_accessors() {
        assert!(Key::Digit(3).is_digit());
        assert_eq!(Key::Digit(3).as_digit(), Some(3));
        assert!(!Key::Confirm.is_digit());
        assert_eq!(Key::Confirm.as_digit(), None);
    }

    #[test]
    fn test_pin_buffer_push_and_drain() {
        let mut buf = PinBuffer::new();
        assert!(buf.is_empty());

        assert!(buf.push(1));
        assert!(buf.push(2));
        assert!(buf.push(3));
        assert_eq!(buf.as_str(), "123");

        assert!(buf.pop_digit());
        assert_eq!(buf.as_str(), "12");

        buf.clear();
        assert!(buf.is_empty());
        assert!(!buf.pop_digit());
    }

    #[test]
    fn test_pin_buffer_silent_drop_at_capacity() {
        let mut buf = PinBuffer::new();
        for d in 1..=5 {
            assert!(buf.push(d));
        }
        assert!(buf.is_full());

        // Further digits are discarded, not overwritten
        assert!(!buf.push(9));
        assert_eq!(buf.as_str(), "12345");
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn test_pin_buffer_net_sequence() {
        // Interleaved pushes and deletes yield the net typed sequence
        let mut buf = PinBuffer::new();
        buf.push(4);
        buf.push(7);
        buf.pop_digit();
        buf.push(2);
        buf.push(0);
        buf.pop_digit();
        assert_eq!(buf.as_str(), "42");
    }

    #[rstest]
    #[case("1")]
    #[case("1234")]
    #[case("99999")]
    fn test_credential_valid(#[case] code: &str) {
        let cred = Credential::new(code).unwrap();
        assert_eq!(cred.as_str(), code);
        assert_eq!(cred.len(), code.len());
    }

    #[rstest]
    #[case("")] // empty
    #[case("123456")] // too long
    #[case("12a4")] // non-digit
    #[case("12 4")] // whitespace
    fn test_credential_invalid(#[case] code: &str) {
        assert!(Credential::new(code).is_err());
    }

    #[test]
    fn test_credential_matches_exact_only() {
        let cred = Credential::new("1234").unwrap();
        assert!(cred.matches("1234"));
        assert!(!cred.matches("123"));
        assert!(!cred.matches("12345"));
        assert!(!cred.matches("1235"));
        assert!(!cred.matches(""));
    }

    #[test]
    fn test_credential_equality() {
        let a = Credential::new("5678").unwrap();
        let b = Credential::new("5678").unwrap();
        let c = Credential::new("5679").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_key_serialization_round_trip() {
        let key = Key::Digit(7);
        let json = serde_json::to_string(&key).unwrap();
        let back: Key = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_key_event_press() {
        let event = KeyEvent::press(Key::Confirm);
        assert_eq!(event.key, Key::Confirm);
        assert!(event.pressed);
    }
}
