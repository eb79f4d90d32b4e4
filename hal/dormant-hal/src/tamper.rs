//! Tamper input and wake-up pin abstractions
//!
//! The tamper input is sampled by the RTC and can wake the chip from
//! standby. In level mode the RTC filters the line by requiring a number of
//! consecutive samples at the trigger level; in edge mode it latches the
//! first transition and no filtering is available.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tamper sampling frequencies accepted by the RTC (Hz)
pub const SAMPLE_FREQUENCIES: [u8; 8] = [1, 2, 4, 8, 16, 32, 64, 128];

/// Consecutive samples accepted by the RTC filter
pub const FILTER_SAMPLES: [u8; 3] = [2, 4, 8];

/// Logic level (or edge direction) that signals a tamper event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TriggerLevel {
    /// Low level, or falling edge in edge mode
    #[default]
    Low,
    /// High level, or rising edge in edge mode
    High,
}

/// Tamper detection setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TamperConfig {
    /// Active level (edge direction in edge mode)
    pub level: TriggerLevel,
    /// Edge-triggered when true, level-triggered with filtering when false
    pub edge: bool,
    /// Sampling frequency in Hz (level mode)
    pub sample_freq: u8,
    /// Consecutive samples required to trigger (level mode)
    pub samples: u8,
    /// Precharge the line before sampling (uses the internal pull-up)
    pub precharge: bool,
}

impl Default for TamperConfig {
    fn default() -> Self {
        Self {
            level: TriggerLevel::Low,
            edge: false,
            sample_freq: 16,
            samples: 2,
            precharge: true,
        }
    }
}

/// Errors from tamper configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TamperError {
    /// Sampling frequency is not a supported power of two
    InvalidFrequency,
    /// Filter sample count is not 2, 4 or 8
    InvalidSamples,
}

impl TamperConfig {
    /// Check the parameters against what the RTC supports
    pub fn validate(&self) -> Result<(), TamperError> {
        if self.edge {
            // Edge mode ignores frequency and filter settings
            return Ok(());
        }
        if !SAMPLE_FREQUENCIES.contains(&self.sample_freq) {
            return Err(TamperError::InvalidFrequency);
        }
        if !FILTER_SAMPLES.contains(&self.samples) {
            return Err(TamperError::InvalidSamples);
        }
        Ok(())
    }

    /// Register encoding of the sampling frequency (0 = 1 Hz ... 7 = 128 Hz)
    pub fn freq_code(&self) -> u8 {
        SAMPLE_FREQUENCIES
            .iter()
            .position(|&f| f == self.sample_freq)
            .unwrap_or(0) as u8
    }

    /// Register encoding of the filter (0 = edge, 1 = 2 samples ... 3 = 8 samples)
    pub fn filter_code(&self) -> u8 {
        if self.edge {
            return 0;
        }
        FILTER_SAMPLES
            .iter()
            .position(|&s| s == self.samples)
            .map(|i| i as u8 + 1)
            .unwrap_or(1)
    }
}

/// RTC tamper input
pub trait TamperInput {
    /// Store the detection parameters; applied by [`TamperInput::enable_tamper`]
    fn configure_tamper(&mut self, config: TamperConfig) -> Result<(), TamperError>;

    /// Check if the raw line is currently at its trigger level
    fn tamper_active(&self) -> bool;

    /// Arm tamper detection, clearing any stale tamper flag first
    fn enable_tamper(&mut self);
}

/// Pin that can wake the chip from standby
pub trait WakeupPin {
    /// Check if the pin is currently asserted
    fn wakeup_active(&self) -> bool;

    /// Arm the pin as a standby wake-up source
    fn enable_wakeup(&mut self);
}
