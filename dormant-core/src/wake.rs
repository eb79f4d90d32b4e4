//! Wake-reason classification
//!
//! The reason is computed once per wake cycle, before any wake source is
//! reconfigured, and stays fixed for the rest of the cycle.

use dormant_hal::power::WakeFlags;

/// Why execution (re)started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum WakeReason {
    /// Cold start: the backup domain lost its contents
    Boot,
    /// Reset or power-on with the backup supply holding the RTC
    PowerUp,
    /// RTC alarm channel A fired
    AlarmA,
    /// RTC alarm channel B fired
    AlarmB,
    /// Periodic RTC wake-up timer expired
    Wakeup,
    /// Tamper input asserted
    Tamper,
    /// External wake-up pin (X1) asserted
    X1,
    /// Woke from standby with no recognised source flag
    Unknown,
}

impl WakeReason {
    /// Check if this is a wake from standby rather than a reset
    pub fn from_standby(&self) -> bool {
        !matches!(self, WakeReason::Boot | WakeReason::PowerUp)
    }
}

/// Map a status snapshot to exactly one wake reason
///
/// When several flags are set the first of tamper, wake-up timer, alarm A,
/// alarm B, wake-up pin wins. Tamper goes first because a tamper event
/// also disturbs the calendar.
pub fn classify(flags: &WakeFlags) -> WakeReason {
    if !flags.standby {
        return if flags.backup_retained {
            WakeReason::PowerUp
        } else {
            WakeReason::Boot
        };
    }

    if flags.tamper {
        WakeReason::Tamper
    } else if flags.rtc_wakeup {
        WakeReason::Wakeup
    } else if flags.alarm_a {
        WakeReason::AlarmA
    } else if flags.alarm_b {
        WakeReason::AlarmB
    } else if flags.wakeup_pin {
        WakeReason::X1
    } else {
        WakeReason::Unknown
    }
}
