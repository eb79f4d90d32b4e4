//! Pyboard (PYBv1.1) wiring
//!
//! | Function       | Pin  | Notes                              |
//! |----------------|------|------------------------------------|
//! | LED 1 (red)    | PA13 | shared with SWDIO                  |
//! | LED 2 (green)  | PA14 | shared with SWCLK                  |
//! | LED 3 (yellow) | PA15 |                                    |
//! | LED 4 (blue)   | PB4  |                                    |
//! | USB VBUS sense | PA9  | high while a USB host is connected |
//! | Wake-up (X1)   | PA0  | WKUP, active high                  |
//! | Tamper 1       | PC13 | RTC_AF1, pulled up                 |
//!
//! Driving the red and green LEDs takes SWD away from a probe. Use RTT
//! over a probe that attaches under reset, or rely on the LEDs alone.

use core::future::Future;

use dormant_core::led::Led;
use dormant_core::traits::IndicatorLeds;
use dormant_drivers::GpioLeds;
use dormant_hal::{
    AlarmChannel, AlarmMatch, BackupError, BackupRam, DateTime, DebugLink, LowPowerDelay,
    PowerControl, RealTimeClock, RtcError, TamperConfig, TamperError, TamperInput, WakeFlags,
    WakeupPin,
};
use dormant_hal_stm32f4::{BackupSram, StopDelay, Stm32Power, Stm32Rtc, Tamper1, WakeupPa0};
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::rcc::LsConfig;
use embassy_stm32::{Config, Peripherals};

type Leds<'d> = GpioLeds<Output<'d>, Output<'d>, Output<'d>, Output<'d>>;

/// Clock setup: default HSI system clock with the 32.768kHz LSE on the RTC
pub fn clock_config() -> Config {
    let mut config = Config::default();
    config.rcc.ls = LsConfig::default_lse();
    config
}

/// Everything a wake cycle touches
pub struct Pyboard<'d> {
    rtc: Stm32Rtc,
    power: Stm32Power<'d>,
    delay: StopDelay,
    leds: Leds<'d>,
    backup: BackupSram,
    tamper: Tamper1<'d>,
    wakeup: WakeupPa0<'d>,
}

impl Pyboard<'static> {
    pub fn new(p: Peripherals) -> Self {
        let leds = GpioLeds::new(
            Output::new(p.PA13, Level::Low, Speed::Low),
            Output::new(p.PA14, Level::Low, Speed::Low),
            Output::new(p.PA15, Level::Low, Speed::Low),
            Output::new(p.PB4, Level::Low, Speed::Low),
        );

        Self {
            rtc: Stm32Rtc::new(),
            power: Stm32Power::new(Input::new(p.PA9, Pull::None)),
            delay: StopDelay::new(),
            leds,
            backup: BackupSram::new(),
            tamper: Tamper1::new(Input::new(p.PC13, Pull::Up)),
            wakeup: WakeupPa0::new(Input::new(p.PA0, Pull::Down)),
        }
    }
}

impl RealTimeClock for Pyboard<'_> {
    fn now(&mut self) -> Result<DateTime, RtcError> {
        self.rtc.now()
    }

    fn set_datetime(&mut self, datetime: &DateTime) -> Result<(), RtcError> {
        self.rtc.set_datetime(datetime)
    }

    fn set_alarm(&mut self, channel: AlarmChannel, alarm: &AlarmMatch) -> Result<(), RtcError> {
        self.rtc.set_alarm(channel, alarm)
    }

    fn cancel_alarm(&mut self, channel: AlarmChannel) -> Result<(), RtcError> {
        self.rtc.cancel_alarm(channel)
    }

    fn set_wakeup(&mut self, period_ms: Option<u32>) -> Result<(), RtcError> {
        self.rtc.set_wakeup(period_ms)
    }
}

impl BackupRam for Pyboard<'_> {
    const WORDS: usize = BackupSram::WORDS;

    fn read(&self, slot: usize) -> Result<u32, BackupError> {
        self.backup.read(slot)
    }

    fn write(&mut self, slot: usize, value: u32) -> Result<(), BackupError> {
        self.backup.write(slot, value)
    }
}

impl PowerControl for Pyboard<'_> {
    fn wake_flags(&self) -> WakeFlags {
        let mut flags = self.power.wake_flags();
        flags.backup_retained &= self.backup.is_retained();
        flags
    }

    fn debug_link(&self) -> DebugLink {
        self.power.debug_link()
    }

    fn suspend_usb(&mut self) {
        self.power.suspend_usb()
    }

    fn enter_standby(&mut self) {
        self.power.enter_standby()
    }
}

impl LowPowerDelay for Pyboard<'_> {
    fn delay_ms(&mut self, ms: u32, link: DebugLink) -> impl Future<Output = ()> {
        self.delay.delay_ms(ms, link)
    }
}

impl IndicatorLeds for Pyboard<'_> {
    fn set_led(&mut self, led: Led, on: bool) {
        self.leds.set_led(led, on)
    }
}

impl TamperInput for Pyboard<'_> {
    fn configure_tamper(&mut self, config: TamperConfig) -> Result<(), TamperError> {
        self.tamper.configure_tamper(config)
    }

    fn tamper_active(&self) -> bool {
        self.tamper.tamper_active()
    }

    fn enable_tamper(&mut self) {
        self.tamper.enable_tamper()
    }
}

impl WakeupPin for Pyboard<'_> {
    fn wakeup_active(&self) -> bool {
        self.wakeup.wakeup_active()
    }

    fn enable_wakeup(&mut self) {
        self.wakeup.enable_wakeup()
    }
}
