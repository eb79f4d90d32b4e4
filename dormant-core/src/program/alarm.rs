//! RTC alarm demo
//!
//! On first boot the clock is set and both alarm channels are programmed.
//! The alarms live in the battery-backed RTC and keep firing once a minute
//! each; every later wake only lights the LED for the channel that fired.
//! Reprogramming them on any other wake would restart their schedule.

use dormant_hal::delay::LowPowerDelay;
use dormant_hal::power::{DebugLink, PowerControl};
use dormant_hal::rtc::{AlarmChannel, RealTimeClock};

use super::CycleReport;
use crate::config::AlarmDemoConfig;
use crate::led::alarm_pattern;
use crate::traits::IndicatorLeds;
use crate::wake::{classify, WakeReason};

/// Everything the alarm demo drives
pub trait AlarmBoard: RealTimeClock + PowerControl + LowPowerDelay + IndicatorLeds {}

impl<T: RealTimeClock + PowerControl + LowPowerDelay + IndicatorLeds> AlarmBoard for T {}

/// RTC alarm demo program
pub struct AlarmDemo {
    config: AlarmDemoConfig,
}

impl AlarmDemo {
    pub fn new(config: AlarmDemoConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlarmDemoConfig {
        &self.config
    }

    /// Run one wake cycle up to, but not including, standby
    pub async fn prepare<B: AlarmBoard>(&self, board: &mut B) -> CycleReport {
        let reason = classify(&board.wake_flags());
        let mut report = CycleReport::new(reason);

        // A previous program may have left the periodic timer running
        let cleared = board.set_wakeup(None);
        report.note(cleared);

        if reason == WakeReason::Boot {
            self.first_boot(board, &mut report);
        }

        report.leds = alarm_pattern(reason);
        board.show(report.leds);

        // Low-power wait even with USB attached, so the LED shows the
        // same timing in both cases
        board.delay_ms(self.config.show_ms, DebugLink::Detached).await;

        report.enters_standby = true;
        report
    }

    /// Run one wake cycle and enter standby
    ///
    /// `inspect` sees the report just before standby.
    pub async fn run<B, F>(&self, board: &mut B, inspect: F) -> CycleReport
    where
        B: AlarmBoard,
        F: FnOnce(&CycleReport),
    {
        let report = self.prepare(board).await;
        inspect(&report);
        board.enter_standby();
        report
    }

    fn first_boot<B: AlarmBoard>(&self, board: &mut B, report: &mut CycleReport) {
        let set = board.set_datetime(&self.config.boot_clock);
        report.note(set);

        let a = board.set_alarm(AlarmChannel::A, &self.config.alarm_a);
        let b = board.set_alarm(AlarmChannel::B, &self.config.alarm_b);
        report.alarms_programmed = a.is_ok() && b.is_ok();
        report.note(a);
        report.note(b);
    }
}

impl Default for AlarmDemo {
    fn default() -> Self {
        Self::new(AlarmDemoConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BOOT_CLOCK;
    use crate::led::{Led, LedSet};
    use crate::mock::{MockBoard, Op};
    use crate::program::Fault;
    use dormant_hal::power::WakeFlags;
    use dormant_hal::rtc::{AlarmMatch, RtcError};
    use embassy_futures::block_on;

    fn run(board: &mut MockBoard) -> CycleReport {
        block_on(AlarmDemo::default().run(board, |_| {}))
    }

    #[test]
    fn test_first_boot_programs_alarms() {
        let mut board = MockBoard::new();
        let report = run(&mut board);

        assert_eq!(report.reason, WakeReason::Boot);
        assert!(report.alarms_programmed);
        assert!(report.is_clean());
        assert_eq!(board.alarms[0], Some(AlarmMatch::every_minute_at(39)));
        assert_eq!(board.alarms[1], Some(AlarmMatch::every_minute_at(9)));
        assert_eq!(board.leds, LedSet::only(Led::Red));

        let ops = board.ops();
        assert_eq!(
            ops.as_slice(),
            &[
                Op::SetWakeup(None),
                Op::SetClock(BOOT_CLOCK),
                Op::SetAlarm(AlarmChannel::A, AlarmMatch::every_minute_at(39)),
                Op::SetAlarm(AlarmChannel::B, AlarmMatch::every_minute_at(9)),
                Op::Led(Led::Red, true),
                Op::Delay(1000, DebugLink::Detached),
                Op::Standby,
            ]
        );
    }

    #[test]
    fn test_each_reason_lights_one_led() {
        let cases = [
            (WakeFlags::default(), Led::Red),
            (
                WakeFlags {
                    backup_retained: true,
                    ..Default::default()
                },
                Led::Blue,
            ),
            (
                WakeFlags {
                    standby: true,
                    alarm_a: true,
                    ..Default::default()
                },
                Led::Green,
            ),
            (
                WakeFlags {
                    standby: true,
                    alarm_b: true,
                    ..Default::default()
                },
                Led::Yellow,
            ),
        ];

        for (flags, led) in cases {
            let mut board = MockBoard::new();
            board.flags = flags;
            let report = run(&mut board);
            assert_eq!(report.leds, LedSet::only(led));
            assert_eq!(board.leds, LedSet::only(led));
        }
    }

    #[test]
    fn test_later_wakes_leave_alarms_alone() {
        let mut board = MockBoard::new();
        run(&mut board);
        let alarms = board.alarms;

        board.flags = WakeFlags {
            standby: true,
            alarm_a: true,
            backup_retained: true,
            ..Default::default()
        };
        board.clear_trace();
        board.leds = LedSet::EMPTY;
        let report = run(&mut board);

        assert!(!report.alarms_programmed);
        assert_eq!(board.alarms, alarms);
        assert!(!board
            .ops()
            .iter()
            .any(|op| matches!(op, Op::SetAlarm(..) | Op::SetClock(_))));
    }

    #[test]
    fn test_unknown_reason_lights_nothing() {
        let mut board = MockBoard::woken(WakeFlags::default());
        let report = run(&mut board);
        assert_eq!(report.reason, WakeReason::Unknown);
        assert!(report.leds.is_empty());
        assert!(board.standby_entered);
    }

    #[test]
    fn test_standby_entered_with_usb_attached() {
        let mut board = MockBoard::woken(WakeFlags {
            alarm_b: true,
            ..Default::default()
        });
        board.link = DebugLink::Attached;
        run(&mut board);
        assert!(board.standby_entered);
    }

    #[test]
    fn test_clock_failure_still_reaches_standby() {
        let mut board = MockBoard::new();
        board.clock_fails = true;
        let report = run(&mut board);
        assert_eq!(report.faults.as_slice(), &[Fault::Rtc(RtcError::Timeout)]);
        assert!(report.alarms_programmed);
        assert!(board.standby_entered);
    }

    #[test]
    fn test_inspect_runs_before_standby() {
        let mut board = MockBoard::new();
        let mut seen = None;
        block_on(AlarmDemo::default().run(&mut board, |report| {
            seen = Some(report.enters_standby);
        }));
        assert_eq!(seen, Some(true));
    }
}
