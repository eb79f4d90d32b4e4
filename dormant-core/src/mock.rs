//! Recording test double for a whole board
//!
//! Implements every HAL and device trait, keeps just enough state to
//! behave like the hardware and logs each side effect in order.

use core::cell::{Cell, RefCell};

use dormant_hal::backup::{BackupError, BackupRam};
use dormant_hal::delay::LowPowerDelay;
use dormant_hal::power::{DebugLink, PowerControl, WakeFlags};
use dormant_hal::rtc::{AlarmChannel, AlarmMatch, DateTime, RealTimeClock, RtcError};
use dormant_hal::tamper::{TamperConfig, TamperError, TamperInput, WakeupPin};
use heapless::Vec;

use crate::led::{Led, LedSet};
use crate::traits::IndicatorLeds;

pub const MOCK_WORDS: usize = 64;

/// 2020-01-01 00:00:00
pub const MOCK_START_MS: u64 = 631_152_000_000;

const TRACE_LEN: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    SetClock(DateTime),
    SetAlarm(AlarmChannel, AlarmMatch),
    CancelAlarm(AlarmChannel),
    SetWakeup(Option<u32>),
    Led(Led, bool),
    Delay(u32, DebugLink),
    BackupWrite(usize, u32),
    ConfigureTamper(TamperConfig),
    TamperPoll(bool),
    WakeupPoll(bool),
    EnableTamper,
    EnableWakeup,
    SuspendUsb,
    Standby,
}

pub struct MockBoard {
    pub flags: WakeFlags,
    pub link: DebugLink,
    pub now_ms: u64,
    pub clock_fails: bool,
    pub timer_fails: bool,
    pub backup: [u32; MOCK_WORDS],
    pub alarms: [Option<AlarmMatch>; 2],
    pub wakeup_ms: Option<u32>,
    pub leds: LedSet,
    pub tamper_config: Option<TamperConfig>,
    pub tamper_armed: bool,
    pub wakeup_armed: bool,
    pub usb_suspended: bool,
    pub standby_entered: bool,
    /// Polls for which the tamper line still reads active
    pub tamper_held: Cell<u32>,
    /// Polls for which the wake-up pin still reads active
    pub wakeup_held: Cell<u32>,
    trace: RefCell<Vec<Op, TRACE_LEN>>,
}

impl MockBoard {
    pub fn new() -> Self {
        Self {
            flags: WakeFlags::default(),
            link: DebugLink::Detached,
            now_ms: MOCK_START_MS,
            clock_fails: false,
            timer_fails: false,
            backup: [0; MOCK_WORDS],
            alarms: [None; 2],
            wakeup_ms: None,
            leds: LedSet::EMPTY,
            tamper_config: None,
            tamper_armed: false,
            wakeup_armed: false,
            usb_suspended: false,
            standby_entered: false,
            tamper_held: Cell::new(0),
            wakeup_held: Cell::new(0),
            trace: RefCell::new(Vec::new()),
        }
    }

    /// Board that woke from standby with `flags` set on top of the standby bit
    pub fn woken(flags: WakeFlags) -> Self {
        let mut board = Self::new();
        board.flags = WakeFlags {
            standby: true,
            backup_retained: true,
            ..flags
        };
        board
    }

    pub fn ops(&self) -> Vec<Op, TRACE_LEN> {
        self.trace.borrow().clone()
    }

    pub fn clear_trace(&self) {
        self.trace.borrow_mut().clear();
    }

    /// Position of the first op equal to `op`
    pub fn position(&self, op: Op) -> Option<usize> {
        self.trace.borrow().iter().position(|o| *o == op)
    }

    fn record(&self, op: Op) {
        self.trace.borrow_mut().push(op).expect("trace full");
    }

    fn poll(held: &Cell<u32>) -> bool {
        let remaining = held.get();
        if remaining > 0 {
            held.set(remaining - 1);
            true
        } else {
            false
        }
    }
}

impl RealTimeClock for MockBoard {
    fn now(&mut self) -> Result<DateTime, RtcError> {
        if self.clock_fails {
            return Err(RtcError::Timeout);
        }
        DateTime::from_epoch_millis(self.now_ms)
    }

    fn set_datetime(&mut self, datetime: &DateTime) -> Result<(), RtcError> {
        if self.clock_fails {
            return Err(RtcError::Timeout);
        }
        datetime.validate()?;
        self.now_ms = datetime.to_epoch_millis();
        self.record(Op::SetClock(*datetime));
        Ok(())
    }

    fn set_alarm(&mut self, channel: AlarmChannel, alarm: &AlarmMatch) -> Result<(), RtcError> {
        alarm.validate()?;
        self.alarms[channel.index()] = Some(*alarm);
        self.record(Op::SetAlarm(channel, *alarm));
        Ok(())
    }

    fn cancel_alarm(&mut self, channel: AlarmChannel) -> Result<(), RtcError> {
        self.alarms[channel.index()] = None;
        self.record(Op::CancelAlarm(channel));
        Ok(())
    }

    fn set_wakeup(&mut self, period_ms: Option<u32>) -> Result<(), RtcError> {
        if self.timer_fails {
            return Err(RtcError::Timeout);
        }
        if period_ms == Some(0) {
            return Err(RtcError::InvalidPeriod);
        }
        self.wakeup_ms = period_ms;
        self.record(Op::SetWakeup(period_ms));
        Ok(())
    }
}

impl BackupRam for MockBoard {
    const WORDS: usize = MOCK_WORDS;

    fn read(&self, slot: usize) -> Result<u32, BackupError> {
        self.backup.get(slot).copied().ok_or(BackupError::OutOfRange)
    }

    fn write(&mut self, slot: usize, value: u32) -> Result<(), BackupError> {
        let word = self.backup.get_mut(slot).ok_or(BackupError::OutOfRange)?;
        *word = value;
        self.record(Op::BackupWrite(slot, value));
        Ok(())
    }
}

impl PowerControl for MockBoard {
    fn wake_flags(&self) -> WakeFlags {
        self.flags
    }

    fn debug_link(&self) -> DebugLink {
        self.link
    }

    fn suspend_usb(&mut self) {
        self.usb_suspended = true;
        self.record(Op::SuspendUsb);
    }

    fn enter_standby(&mut self) {
        self.standby_entered = true;
        self.record(Op::Standby);
    }
}

impl LowPowerDelay for MockBoard {
    async fn delay_ms(&mut self, ms: u32, link: DebugLink) {
        self.now_ms += ms as u64;
        self.record(Op::Delay(ms, link));
    }
}

impl TamperInput for MockBoard {
    fn configure_tamper(&mut self, config: TamperConfig) -> Result<(), TamperError> {
        config.validate()?;
        self.tamper_config = Some(config);
        self.record(Op::ConfigureTamper(config));
        Ok(())
    }

    fn tamper_active(&self) -> bool {
        let active = Self::poll(&self.tamper_held);
        self.record(Op::TamperPoll(active));
        active
    }

    fn enable_tamper(&mut self) {
        self.tamper_armed = true;
        self.record(Op::EnableTamper);
    }
}

impl WakeupPin for MockBoard {
    fn wakeup_active(&self) -> bool {
        let active = Self::poll(&self.wakeup_held);
        self.record(Op::WakeupPoll(active));
        active
    }

    fn enable_wakeup(&mut self) {
        self.wakeup_armed = true;
        self.record(Op::EnableWakeup);
    }
}

impl IndicatorLeds for MockBoard {
    fn set_led(&mut self, led: Led, on: bool) {
        if on {
            self.leds.insert(led);
        } else {
            self.leds.remove(led);
        }
        self.record(Op::Led(led, on));
    }
}
