//! Demo programs
//!
//! Each program is one wake cycle: classify the wake reason, signal it on
//! the LEDs, update persisted state, rearm the wake sources and enter
//! standby. Standby ends the program on hardware; the next wake event
//! starts it again from reset.
//!
//! Peripheral failures never abort a cycle. They are collected as
//! [`Fault`]s in the [`CycleReport`] and the cycle carries on to standby.

pub mod alarm;
pub mod tamper;

pub use alarm::{AlarmBoard, AlarmDemo};
pub use tamper::{TamperBoard, TamperDemo};

use dormant_hal::backup::BackupError;
use dormant_hal::rtc::RtcError;
use dormant_hal::tamper::TamperError;
use heapless::Vec;

use crate::deadline::TimingError;
use crate::led::LedSet;
use crate::wake::WakeReason;

/// Faults kept per report
///
/// The most a cycle can record: the tamper demo's boot path has eight
/// fallible steps (tamper setup, clock set, two alarm cancels, timestamp,
/// origin save, remaining time, wake-up timer).
pub const MAX_FAULTS: usize = 8;

/// A recoverable failure during a wake cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    Rtc(RtcError),
    Backup(BackupError),
    Tamper(TamperError),
    Timing(TimingError),
}

impl From<RtcError> for Fault {
    fn from(e: RtcError) -> Self {
        Fault::Rtc(e)
    }
}

impl From<BackupError> for Fault {
    fn from(e: BackupError) -> Self {
        Fault::Backup(e)
    }
}

impl From<TamperError> for Fault {
    fn from(e: TamperError) -> Self {
        Fault::Tamper(e)
    }
}

impl From<TimingError> for Fault {
    fn from(e: TimingError) -> Self {
        Fault::Timing(e)
    }
}

/// What a wake cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Classified wake reason
    pub reason: WakeReason,
    /// LEDs lit for the reason
    pub leds: LedSet,
    /// Alarm channels were (re)programmed this cycle
    pub alarms_programmed: bool,
    /// Timestamp written to backup RAM (seconds since 2000)
    pub timestamp: Option<u32>,
    /// Wake-up timer period programmed before standby (ms)
    pub wake_period_ms: Option<u32>,
    /// Standby follows the report
    pub enters_standby: bool,
    /// Recoverable failures
    pub faults: Vec<Fault, MAX_FAULTS>,
}

impl CycleReport {
    pub(crate) fn new(reason: WakeReason) -> Self {
        Self {
            reason,
            leds: LedSet::EMPTY,
            alarms_programmed: false,
            timestamp: None,
            wake_period_ms: None,
            enters_standby: false,
            faults: Vec::new(),
        }
    }

    /// Record the error of `result`, if any, and pass the value through
    pub(crate) fn note<T, E: Into<Fault>>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                let _ = self.faults.push(e.into());
                None
            }
        }
    }

    /// Check if the cycle completed without faults
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}
