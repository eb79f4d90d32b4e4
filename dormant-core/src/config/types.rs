//! Configuration type definitions
//!
//! Defaults reproduce the reference demo setup: both programs reset the
//! clock to 2015-08-06 13:00:00 (a Thursday) on first boot, the alarm demo
//! fires at 39 and 9 seconds past every minute, and the tamper demo runs a
//! 10 second period.

use dormant_hal::rtc::{AlarmChannel, AlarmMatch, DateTime, MAX_WAKEUP_MS};
use dormant_hal::tamper::{TamperConfig, TamperError};

use crate::deadline::ORIGIN_WORDS;
use crate::rearm::ReleaseTiming;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Calendar value written on first boot
pub const BOOT_CLOCK: DateTime = DateTime {
    year: 2015,
    month: 8,
    day: 6,
    weekday: 4,
    hour: 13,
    minute: 0,
    second: 0,
    millis: 0,
};

/// Upper bound for the encoded configuration blob
pub const MAX_ENCODED_LEN: usize = 128;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Boot clock is not a valid calendar value
    InvalidBootClock,
    /// Alarm match fields out of range
    InvalidAlarm(AlarmChannel),
    /// Tamper setup not supported by the RTC
    InvalidTamper(TamperError),
    /// Period, fallback or floor is zero or too long for the wake-up timer
    InvalidPeriod,
    /// Timestamp slot is outside backup RAM or overlaps the saved origin
    InvalidSlot,
    /// Postcard encoding or decoding failed
    Encoding,
}

/// RTC alarm demo settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AlarmDemoConfig {
    /// Calendar set on first boot
    pub boot_clock: DateTime,
    /// Schedule for alarm channel A
    pub alarm_a: AlarmMatch,
    /// Schedule for alarm channel B
    pub alarm_b: AlarmMatch,
    /// How long the wake LED stays lit before standby (ms)
    pub show_ms: u32,
}

impl Default for AlarmDemoConfig {
    fn default() -> Self {
        Self {
            boot_clock: BOOT_CLOCK,
            alarm_a: AlarmMatch::every_minute_at(39),
            alarm_b: AlarmMatch::every_minute_at(9),
            show_ms: 1000,
        }
    }
}

impl AlarmDemoConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.boot_clock
            .validate()
            .map_err(|_| ConfigError::InvalidBootClock)?;
        self.alarm_a
            .validate()
            .map_err(|_| ConfigError::InvalidAlarm(AlarmChannel::A))?;
        self.alarm_b
            .validate()
            .map_err(|_| ConfigError::InvalidAlarm(AlarmChannel::B))?;
        Ok(())
    }
}

/// Tamper/timer demo settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TamperDemoConfig {
    /// Calendar set on first boot
    pub boot_clock: DateTime,
    /// Tamper detection setup
    pub tamper: TamperConfig,
    /// Nominal wake-up period (ms)
    pub period_ms: u32,
    /// Period used when the remaining time cannot be computed (ms)
    pub fallback_ms: u32,
    /// Shortest wake-up period ever programmed (ms)
    pub min_sleep_ms: u32,
    /// How long the wake LEDs stay lit (ms)
    pub show_ms: u32,
    /// Sleep between polls of an active wake line (ms)
    pub poll_ms: u32,
    /// Debounce wait after both lines cleared (ms)
    pub settle_ms: u32,
    /// Backup slot receiving the wake timestamp (seconds since 2000)
    pub timestamp_slot: u16,
}

impl Default for TamperDemoConfig {
    fn default() -> Self {
        Self {
            boot_clock: BOOT_CLOCK,
            tamper: TamperConfig::default(),
            period_ms: 10_000,
            fallback_ms: 10_000,
            min_sleep_ms: 1000,
            show_ms: 500,
            poll_ms: 50,
            settle_ms: 50,
            timestamp_slot: 0,
        }
    }
}

impl TamperDemoConfig {
    /// Check settings against a backup store of `backup_words` slots
    pub fn validate(&self, backup_words: usize) -> Result<(), ConfigError> {
        self.boot_clock
            .validate()
            .map_err(|_| ConfigError::InvalidBootClock)?;
        self.tamper.validate().map_err(ConfigError::InvalidTamper)?;

        let periods = [self.period_ms, self.fallback_ms, self.min_sleep_ms];
        if periods.iter().any(|&p| p == 0 || p > MAX_WAKEUP_MS) || self.poll_ms == 0 {
            return Err(ConfigError::InvalidPeriod);
        }

        if backup_words < ORIGIN_WORDS
            || self.timestamp_slot as usize >= backup_words - ORIGIN_WORDS
        {
            return Err(ConfigError::InvalidSlot);
        }
        Ok(())
    }

    /// Delays of the release sequence
    pub fn release_timing(&self) -> ReleaseTiming {
        ReleaseTiming {
            show_ms: self.show_ms,
            poll_ms: self.poll_ms,
            settle_ms: self.settle_ms,
        }
    }
}

/// Settings for both programs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DemoConfig {
    #[cfg_attr(feature = "serde", serde(default))]
    pub alarm: AlarmDemoConfig,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tamper: TamperDemoConfig,
}

impl DemoConfig {
    /// Validate both sections
    pub fn validate(&self, backup_words: usize) -> Result<(), ConfigError> {
        self.alarm.validate()?;
        self.tamper.validate(backup_words)
    }
}

#[cfg(feature = "serde")]
impl DemoConfig {
    /// Serialize to postcard, returning the used part of `buf`
    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Encoding)
    }

    /// Deserialize from postcard
    pub fn decode(bytes: &[u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(|_| ConfigError::Encoding)
    }
}
