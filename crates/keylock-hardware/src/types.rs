//! Shared hardware data types.

use std::fmt;

/// Indicator lamp channels on the lock actuator board.
///
/// Each grant path has its own lamp so an observer at the door can tell
/// which credential class was used without consulting the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorChannel {
    /// Lamp flashed on master-credential grants.
    Master,

    /// Lamp flashed on guest-credential grants.
    Guest,
}

impl fmt::Display for IndicatorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorChannel::Master => write!(f, "master indicator"),
            IndicatorChannel::Guest => write!(f, "guest indicator"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_channel_display() {
        assert_eq!(IndicatorChannel::Master.to_string(), "master indicator");
        assert_eq!(IndicatorChannel::Guest.to_string(), "guest indicator");
    }
}
