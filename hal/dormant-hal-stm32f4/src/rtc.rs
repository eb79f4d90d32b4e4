//! RTC driver for STM32F4 (v2 RTC)
//!
//! Calendar, alarm A/B and wake-up timer. All writes go through
//! [`unlocked`] which enables backup-domain access and lifts the RTC write
//! protection for the duration of the closure.

use dormant_hal::rtc::{AlarmChannel, AlarmMatch, DateTime, RealTimeClock, RtcError, MAX_WAKEUP_MS};
use embassy_stm32::pac;

// RTC_CR
pub(crate) const CR_FMT: u32 = 1 << 6;
pub(crate) const CR_ALRAE: u32 = 1 << 8;
pub(crate) const CR_WUTE: u32 = 1 << 10;
pub(crate) const CR_ALRAIE: u32 = 1 << 12;
pub(crate) const CR_WUTIE: u32 = 1 << 14;
pub(crate) const CR_WUCKSEL_MASK: u32 = 0b111;

// RTC_ISR
pub(crate) const ISR_ALRAWF: u32 = 1 << 0;
pub(crate) const ISR_WUTWF: u32 = 1 << 2;
pub(crate) const ISR_INITS: u32 = 1 << 4;
pub(crate) const ISR_RSF: u32 = 1 << 5;
pub(crate) const ISR_INITF: u32 = 1 << 6;
pub(crate) const ISR_INIT: u32 = 1 << 7;
pub(crate) const ISR_ALRAF: u32 = 1 << 8;
pub(crate) const ISR_ALRBF: u32 = 1 << 9;
pub(crate) const ISR_WUTF: u32 = 1 << 10;
pub(crate) const ISR_TSF: u32 = 1 << 11;
pub(crate) const ISR_TSOVF: u32 = 1 << 12;
pub(crate) const ISR_TAMP1F: u32 = 1 << 13;

/// Every event flag that can hold off or trigger a standby wake
pub(crate) const ISR_WAKE_FLAGS: u32 =
    ISR_ALRAF | ISR_ALRBF | ISR_WUTF | ISR_TSF | ISR_TSOVF | ISR_TAMP1F;

// RTC_ALRMxR masks ("don't care" bits)
const ALRM_MSK1: u32 = 1 << 7;
const ALRM_MSK2: u32 = 1 << 15;
const ALRM_MSK3: u32 = 1 << 23;
const ALRM_WDSEL: u32 = 1 << 30;
const ALRM_MSK4: u32 = 1 << 31;

// PWR_CR
pub(crate) const PWR_CR_DBP: u32 = 1 << 8;

/// Prescalers for a 32.768 kHz LSE: 32768 / (127 + 1) / (255 + 1) = 1 Hz
const PREDIV_A: u32 = 127;
const PREDIV_S: u32 = 255;

/// Wake-up clock RTCCLK/16 = 2048 Hz
const WUCKSEL_DIV16: u32 = 0b000;
/// Wake-up clock ck_spre = 1 Hz
const WUCKSEL_SPRE: u32 = 0b100;
/// ck_spre with 2^16 added to the reload value
const WUCKSEL_SPRE_EXT: u32 = 0b110;

/// Longest period the 2048 Hz clock can count (ms)
const DIV16_MAX_MS: u32 = 32_000;

/// Polling budget for flags that the RTC raises within a few RTCCLK cycles
const FLAG_TIMEOUT: u32 = 100_000;

pub(crate) fn bcd(value: u8) -> u32 {
    (((value / 10) << 4) | (value % 10)) as u32
}

pub(crate) fn from_bcd(bits: u32) -> u8 {
    ((bits >> 4) & 0xF) as u8 * 10 + (bits & 0xF) as u8
}

/// Run `f` with backup-domain and RTC write access enabled
pub(crate) fn unlocked<R>(f: impl FnOnce() -> R) -> R {
    pac::PWR.cr1().modify(|w| w.0 |= PWR_CR_DBP);
    pac::RTC.wpr().write(|w| w.0 = 0xCA);
    pac::RTC.wpr().write(|w| w.0 = 0x53);
    let result = f();
    pac::RTC.wpr().write(|w| w.0 = 0xFF);
    result
}

/// Spin until every bit in `mask` reads set in RTC_ISR
pub(crate) fn wait_isr(mask: u32) -> Result<(), RtcError> {
    for _ in 0..FLAG_TIMEOUT {
        if pac::RTC.isr().read().0 & mask == mask {
            return Ok(());
        }
    }
    Err(RtcError::Timeout)
}

/// Clear event flags in RTC_ISR (rc_w0: writing 1 leaves a flag alone)
pub(crate) fn clear_isr(mask: u32) {
    pac::RTC.isr().modify(|w| w.0 &= !mask);
}

/// WUCKSEL and reload value for a wake-up period
pub(crate) fn wakeup_reload(period_ms: u32) -> Result<(u32, u32), RtcError> {
    if period_ms == 0 || period_ms > MAX_WAKEUP_MS {
        return Err(RtcError::InvalidPeriod);
    }
    if period_ms <= DIV16_MAX_MS {
        let ticks = (period_ms as u64 * 2048 / 1000).max(1) as u32;
        return Ok((WUCKSEL_DIV16, ticks - 1));
    }
    let secs = period_ms / 1000;
    if secs <= 0x1_0000 {
        Ok((WUCKSEL_SPRE, secs - 1))
    } else {
        Ok((WUCKSEL_SPRE_EXT, secs - 1 - 0x1_0000))
    }
}

/// Program and start the wake-up timer. Caller holds write access.
pub(crate) fn start_wakeup(period_ms: u32) -> Result<(), RtcError> {
    let (wucksel, reload) = wakeup_reload(period_ms)?;
    stop_wakeup()?;
    pac::RTC.wutr().write(|w| w.0 = reload);
    pac::RTC.cr().modify(|w| {
        w.0 = (w.0 & !CR_WUCKSEL_MASK) | wucksel | CR_WUTE | CR_WUTIE;
    });
    Ok(())
}

/// Stop the wake-up timer and clear its flag. Caller holds write access.
pub(crate) fn stop_wakeup() -> Result<(), RtcError> {
    pac::RTC.cr().modify(|w| w.0 &= !(CR_WUTE | CR_WUTIE));
    wait_isr(ISR_WUTWF)?;
    clear_isr(ISR_WUTF);
    Ok(())
}

fn encode_alarm(alarm: &AlarmMatch) -> u32 {
    let mut bits = 0;
    match alarm.second {
        Some(s) => bits |= bcd(s),
        None => bits |= ALRM_MSK1,
    }
    match alarm.minute {
        Some(m) => bits |= bcd(m) << 8,
        None => bits |= ALRM_MSK2,
    }
    match alarm.hour {
        Some(h) => bits |= bcd(h) << 16,
        None => bits |= ALRM_MSK3,
    }
    match (alarm.day, alarm.weekday) {
        (Some(d), _) => bits |= bcd(d) << 24,
        (None, Some(w)) => bits |= ALRM_WDSEL | ((w as u32) << 24),
        (None, None) => bits |= ALRM_MSK4,
    }
    bits
}

/// Handle for the RTC calendar, alarms and wake-up timer
pub struct Stm32Rtc {
    _private: (),
}

impl Default for Stm32Rtc {
    fn default() -> Self {
        Self::new()
    }
}

impl Stm32Rtc {
    /// Create the driver
    ///
    /// The RTC clock source (LSE) must already be selected, which
    /// `embassy_stm32::init` does when `rcc.ls` is configured for it.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl RealTimeClock for Stm32Rtc {
    fn now(&mut self) -> Result<DateTime, RtcError> {
        // Wait for the shadow registers to resynchronise after a wake
        unlocked(|| clear_isr(ISR_RSF));
        wait_isr(ISR_RSF)?;

        // Reading SSR then TR locks the shadows until DR is read
        let ssr = pac::RTC.ssr().read().0 & 0xFFFF;
        let tr = pac::RTC.tr().read().0;
        let dr = pac::RTC.dr().read().0;

        let millis = (PREDIV_S.saturating_sub(ssr) * 1000 / (PREDIV_S + 1)) as u16;
        let dt = DateTime {
            year: 2000 + from_bcd((dr >> 16) & 0xFF) as u16,
            month: from_bcd((dr >> 8) & 0x1F),
            day: from_bcd(dr & 0x3F),
            weekday: ((dr >> 13) & 0x7) as u8,
            hour: from_bcd((tr >> 16) & 0x3F),
            minute: from_bcd((tr >> 8) & 0x7F),
            second: from_bcd(tr & 0x7F),
            millis: millis.min(999),
        };
        dt.validate()?;
        Ok(dt)
    }

    fn set_datetime(&mut self, datetime: &DateTime) -> Result<(), RtcError> {
        datetime.validate()?;

        let tr = bcd(datetime.second) | bcd(datetime.minute) << 8 | bcd(datetime.hour) << 16;
        let dr = bcd(datetime.day)
            | bcd(datetime.month) << 8
            | (datetime.weekday as u32) << 13
            | bcd((datetime.year - 2000) as u8) << 16;

        unlocked(|| {
            pac::RTC.isr().modify(|w| w.0 |= ISR_INIT);
            let ready = wait_isr(ISR_INITF);
            if ready.is_ok() {
                pac::RTC.prer().write(|w| w.0 = PREDIV_S);
                pac::RTC.prer().write(|w| w.0 = (PREDIV_A << 16) | PREDIV_S);
                pac::RTC.cr().modify(|w| w.0 &= !CR_FMT);
                pac::RTC.tr().write(|w| w.0 = tr);
                pac::RTC.dr().write(|w| w.0 = dr);
            }
            pac::RTC.isr().modify(|w| w.0 &= !ISR_INIT);
            ready
        })
    }

    fn set_alarm(&mut self, channel: AlarmChannel, alarm: &AlarmMatch) -> Result<(), RtcError> {
        alarm.validate()?;
        let index = channel.index();
        let enable = CR_ALRAE << index;
        let interrupt = CR_ALRAIE << index;

        unlocked(|| {
            pac::RTC.cr().modify(|w| w.0 &= !(enable | interrupt));
            wait_isr(ISR_ALRAWF << index)?;
            pac::RTC.alrmr(index).write(|w| w.0 = encode_alarm(alarm));
            clear_isr(ISR_ALRAF << index);
            pac::RTC.cr().modify(|w| w.0 |= enable | interrupt);
            Ok(())
        })
    }

    fn cancel_alarm(&mut self, channel: AlarmChannel) -> Result<(), RtcError> {
        let index = channel.index();
        unlocked(|| {
            pac::RTC
                .cr()
                .modify(|w| w.0 &= !((CR_ALRAE | CR_ALRAIE) << index));
            clear_isr(ISR_ALRAF << index);
        });
        Ok(())
    }

    fn set_wakeup(&mut self, period_ms: Option<u32>) -> Result<(), RtcError> {
        unlocked(|| match period_ms {
            Some(ms) => start_wakeup(ms),
            None => stop_wakeup(),
        })
    }
}
