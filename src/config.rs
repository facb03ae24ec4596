//! Timing configuration

use core::fmt;

use crate::Duration;

/// How long things take. Every hold blocks scanning until it is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timings {
    /// Time a contact must stay at a new level before the change is reported
    pub settle: Duration,
    /// Least time between two accepted presses of the same key
    pub rearm: Duration,
    /// Splash screen time after boot
    pub startup_hold: Duration,
    /// Time a typed command stays on the screen before release is awaited
    pub key_hold: Duration,
    /// Time the "Not Mapped" screen stays up
    pub unmapped_hold: Duration,
    /// Time the new mode is announced; the press that switched modes cannot leak into the
    /// new mode's table during it
    pub mode_switch_hold: Duration,
    /// Pause between scans
    pub scan_interval: Duration,
    /// Give up waiting for a key to be released after this long, `None` waits forever
    pub release_timeout: Option<Duration>,
}

impl Timings {
    pub const DEFAULT: Timings = Timings {
        settle: Duration::millis(10),
        rearm: Duration::millis(250),
        startup_hold: Duration::millis(1000),
        key_hold: Duration::millis(300),
        unmapped_hold: Duration::millis(300),
        mode_switch_hold: Duration::millis(1000),
        scan_interval: Duration::millis(10),
        release_timeout: Some(Duration::secs(5)),
    };

    pub const fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub const fn with_rearm(mut self, rearm: Duration) -> Self {
        self.rearm = rearm;
        self
    }

    pub const fn with_startup_hold(mut self, hold: Duration) -> Self {
        self.startup_hold = hold;
        self
    }

    pub const fn with_key_hold(mut self, hold: Duration) -> Self {
        self.key_hold = hold;
        self
    }

    pub const fn with_unmapped_hold(mut self, hold: Duration) -> Self {
        self.unmapped_hold = hold;
        self
    }

    pub const fn with_mode_switch_hold(mut self, hold: Duration) -> Self {
        self.mode_switch_hold = hold;
        self
    }

    pub const fn with_scan_interval(mut self, interval: Duration) -> Self {
        self.scan_interval = interval;
        self
    }

    pub const fn with_release_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.release_timeout = timeout;
        self
    }

    /// Usable from `const` items, so a bad board configuration fails to build
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.scan_interval.ticks() == 0 {
            return Err(ConfigError::ZeroScanInterval);
        }
        if self.mode_switch_hold.ticks() < self.key_hold.ticks() {
            return Err(ConfigError::ModeSwitchShorterThanKeyHold);
        }
        if self.mode_switch_hold.ticks() < self.unmapped_hold.ticks() {
            return Err(ConfigError::ModeSwitchShorterThanUnmappedHold);
        }
        Ok(())
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    ZeroScanInterval,
    ModeSwitchShorterThanKeyHold,
    ModeSwitchShorterThanUnmappedHold,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroScanInterval => write!(f, "scan interval must not be zero"),
            ConfigError::ModeSwitchShorterThanKeyHold => {
                write!(f, "mode switch hold is shorter than the key hold")
            }
            ConfigError::ModeSwitchShorterThanUnmappedHold => {
                write!(f, "mode switch hold is shorter than the unmapped hold")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Timings::default().validate(), Ok(()));
        assert_eq!(Timings::DEFAULT.settle, Duration::millis(10));
        assert_eq!(Timings::DEFAULT.rearm, Duration::millis(250));
        assert_eq!(Timings::DEFAULT.scan_interval, Duration::millis(10));
    }

    #[test]
    fn mode_switch_hold_must_cover_feedback() {
        let timings = Timings::DEFAULT.with_key_hold(Duration::millis(1500));
        assert_eq!(
            timings.validate(),
            Err(ConfigError::ModeSwitchShorterThanKeyHold)
        );

        let timings = Timings::DEFAULT.with_unmapped_hold(Duration::millis(1001));
        assert_eq!(
            timings.validate(),
            Err(ConfigError::ModeSwitchShorterThanUnmappedHold)
        );

        let timings = Timings::DEFAULT
            .with_key_hold(Duration::millis(1000))
            .with_unmapped_hold(Duration::millis(1000));
        assert_eq!(timings.validate(), Ok(()));
    }

    #[test]
    fn scan_interval_must_be_positive() {
        let timings = Timings::DEFAULT.with_scan_interval(Duration::millis(0));
        assert_eq!(timings.validate(), Err(ConfigError::ZeroScanInterval));
        assert_eq!(
            ConfigError::ZeroScanInterval.to_string(),
            "scan interval must not be zero"
        );
    }
}
