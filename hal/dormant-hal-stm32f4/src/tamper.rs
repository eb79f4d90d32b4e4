//! Tamper input (RTC_AF1, PC13) and wake-up pin (WKUP, PA0)

use dormant_hal::tamper::{TamperConfig, TamperError, TamperInput, TriggerLevel, WakeupPin};
use embassy_stm32::gpio::Input;
use embassy_stm32::pac;

use crate::rtc::{clear_isr, unlocked, ISR_TAMP1F};

// RTC_TAFCR
const TAFCR_TAMP1E: u32 = 1 << 0;
const TAFCR_TAMP1TRG: u32 = 1 << 1;
const TAFCR_TAMPIE: u32 = 1 << 2;
const TAFCR_TAMPFREQ_SHIFT: u32 = 8;
const TAFCR_TAMPFLT_SHIFT: u32 = 11;
const TAFCR_TAMPPUDIS: u32 = 1 << 15;

// PWR_CSR
const PWR_CSR_EWUP: u32 = 1 << 8;

/// RTC tamper 1 on PC13
pub struct Tamper1<'d> {
    line: Input<'d>,
    config: TamperConfig,
}

impl<'d> Tamper1<'d> {
    /// Create the driver; `line` reads the tamper pin
    pub fn new(line: Input<'d>) -> Self {
        Self {
            line,
            config: TamperConfig::default(),
        }
    }

    fn tafcr_bits(&self) -> u32 {
        let config = &self.config;
        let mut bits = TAFCR_TAMP1E | TAFCR_TAMPIE;
        bits |= (config.freq_code() as u32) << TAFCR_TAMPFREQ_SHIFT;
        bits |= (config.filter_code() as u32) << TAFCR_TAMPFLT_SHIFT;
        if !config.precharge {
            bits |= TAFCR_TAMPPUDIS;
        }
        // TAMP1TRG: in edge mode 1 = falling edge, in level mode 1 = high level
        let trg = match (config.edge, config.level) {
            (true, TriggerLevel::Low) => true,
            (true, TriggerLevel::High) => false,
            (false, TriggerLevel::Low) => false,
            (false, TriggerLevel::High) => true,
        };
        if trg {
            bits |= TAFCR_TAMP1TRG;
        }
        bits
    }
}

impl TamperInput for Tamper1<'_> {
    fn configure_tamper(&mut self, config: TamperConfig) -> Result<(), TamperError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    fn tamper_active(&self) -> bool {
        match self.config.level {
            TriggerLevel::Low => self.line.is_low(),
            TriggerLevel::High => self.line.is_high(),
        }
    }

    fn enable_tamper(&mut self) {
        let bits = self.tafcr_bits();
        unlocked(|| {
            // Disable before changing trigger settings to avoid a false event
            pac::RTC.tafcr().write(|w| w.0 = 0);
            clear_isr(ISR_TAMP1F);
            pac::RTC.tafcr().write(|w| w.0 = bits);
        });
    }
}

/// Standby wake-up pin WKUP on PA0 (pyboard X1), active on a rising edge
pub struct WakeupPa0<'d> {
    line: Input<'d>,
}

impl<'d> WakeupPa0<'d> {
    pub fn new(line: Input<'d>) -> Self {
        Self { line }
    }
}

impl WakeupPin for WakeupPa0<'_> {
    fn wakeup_active(&self) -> bool {
        self.line.is_high()
    }

    fn enable_wakeup(&mut self) {
        pac::PWR.csr1().modify(|w| w.0 |= PWR_CSR_EWUP);
    }
}
