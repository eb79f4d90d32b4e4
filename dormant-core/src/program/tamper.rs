//! Tamper and wake-up timer demo
//!
//! Three sources end standby: the periodic RTC wake-up timer, the tamper
//! input and the X1 wake-up pin. A timer wake starts a new period; a pin
//! or tamper wake only shows its LEDs and goes back to sleep for whatever
//! is left of the current period, so the timer keeps its rhythm.

use dormant_hal::backup::BackupRam;
use dormant_hal::power::PowerControl;
use dormant_hal::rtc::{AlarmChannel, RealTimeClock};
use dormant_hal::tamper::{TamperInput, WakeupPin};

use super::{AlarmBoard, CycleReport};
use crate::config::TamperDemoConfig;
use crate::deadline::{remaining, save_time, sleep_period};
use crate::led::tamper_pattern;
use crate::rearm::release_wake_lines;
use crate::traits::IndicatorLeds;
use crate::wake::{classify, WakeReason};

/// Everything the tamper demo drives
pub trait TamperBoard: AlarmBoard + BackupRam + TamperInput + WakeupPin {}

impl<T: AlarmBoard + BackupRam + TamperInput + WakeupPin> TamperBoard for T {}

/// Tamper/timer demo program
pub struct TamperDemo {
    config: TamperDemoConfig,
}

impl TamperDemo {
    pub fn new(config: TamperDemoConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TamperDemoConfig {
        &self.config
    }

    /// Run one wake cycle up to, but not including, standby
    pub async fn prepare<B: TamperBoard>(&self, board: &mut B) -> CycleReport {
        let reason = classify(&board.wake_flags());
        let mut report = CycleReport::new(reason);

        // Stored only; the hardware is reconfigured by enable_tamper()
        let configured = board.configure_tamper(self.config.tamper);
        report.note(configured);

        board.all_off();
        let link = board.debug_link();
        if !link.is_attached() {
            board.suspend_usb();
        }

        let new_period = matches!(reason, WakeReason::Boot | WakeReason::Wakeup);
        if reason == WakeReason::Boot {
            let set = board.set_datetime(&self.config.boot_clock);
            report.note(set);
            // Alarms left behind by the alarm demo would wake us as Unknown
            for channel in [AlarmChannel::A, AlarmChannel::B] {
                let cancelled = board.cancel_alarm(channel);
                report.note(cancelled);
            }
        }

        report.leds = tamper_pattern(reason);
        board.show(report.leds);

        if new_period {
            let stamped = self.stamp(board, &mut report);
            report.timestamp = stamped;
            let saved = save_time(board);
            report.note(saved);
        }

        release_wake_lines(board, &self.config.release_timing(), link).await;

        let left = remaining(board, self.config.period_ms);
        if let Err(e) = left {
            report.note::<(), _>(Err(e));
        }
        let period = sleep_period(left, self.config.fallback_ms, self.config.min_sleep_ms);

        // Reconfigure the wake sources last, shortly before standby
        let armed = board.set_wakeup(Some(period));
        if report.note(armed).is_some() {
            report.wake_period_ms = Some(period);
        }
        board.enable_tamper();
        board.enable_wakeup();

        // Standby would cut the USB/debug connection
        report.enters_standby = !link.is_attached();
        report
    }

    /// Run one wake cycle and enter standby unless a debug link is attached
    ///
    /// `inspect` sees the report just before standby.
    pub async fn run<B, F>(&self, board: &mut B, inspect: F) -> CycleReport
    where
        B: TamperBoard,
        F: FnOnce(&CycleReport),
    {
        let report = self.prepare(board).await;
        inspect(&report);
        if report.enters_standby {
            board.enter_standby();
        }
        report
    }

    /// Write the current time to the timestamp slot
    fn stamp<B: TamperBoard>(&self, board: &mut B, report: &mut CycleReport) -> Option<u32> {
        let now = report.note(board.now())?.to_epoch_seconds();
        let written = board.write(self.config.timestamp_slot as usize, now);
        report.note(written).map(|_| now)
    }
}

impl Default for TamperDemo {
    fn default() -> Self {
        Self::new(TamperDemoConfig::default())
    }
}
