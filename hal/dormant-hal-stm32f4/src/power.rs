//! Power controller for STM32F4
//!
//! Reads the standby/wake-up status, watches USB VBUS for an attached host
//! and performs the standby entry sequence.

use dormant_hal::power::{DebugLink, PowerControl, WakeFlags};
use embassy_stm32::gpio::Input;
use embassy_stm32::pac;

use crate::rtc::{
    clear_isr, unlocked, ISR_ALRAF, ISR_ALRBF, ISR_INITS, ISR_TAMP1F, ISR_WAKE_FLAGS, ISR_WUTF,
};

// PWR_CR
pub(crate) const PWR_CR_LPDS: u32 = 1 << 0;
pub(crate) const PWR_CR_PDDS: u32 = 1 << 1;
const PWR_CR_CWUF: u32 = 1 << 2;
const PWR_CR_CSBF: u32 = 1 << 3;

// PWR_CSR
const PWR_CSR_WUF: u32 = 1 << 0;
const PWR_CSR_SBF: u32 = 1 << 1;

// RCC_AHB2ENR
const AHB2ENR_OTGFSEN: u32 = 1 << 7;

/// Set or clear SLEEPDEEP in the Cortex-M system control register
pub(crate) fn set_sleepdeep(on: bool) {
    // SAFETY: the SCB is only touched here, from the only thread of execution
    let mut scb = unsafe { cortex_m::Peripherals::steal() }.SCB;
    if on {
        scb.set_sleepdeep();
    } else {
        scb.clear_sleepdeep();
    }
}

/// Power controller with VBUS sensing
pub struct Stm32Power<'d> {
    vbus: Input<'d>,
}

impl<'d> Stm32Power<'d> {
    /// Create the controller; `vbus` is the USB VBUS sense pin (PA9 on the pyboard)
    pub fn new(vbus: Input<'d>) -> Self {
        Self { vbus }
    }
}

impl PowerControl for Stm32Power<'_> {
    fn wake_flags(&self) -> WakeFlags {
        let csr = pac::PWR.csr1().read().0;
        let isr = pac::RTC.isr().read().0;

        WakeFlags {
            standby: csr & PWR_CSR_SBF != 0,
            wakeup_pin: csr & PWR_CSR_WUF != 0,
            rtc_wakeup: isr & ISR_WUTF != 0,
            alarm_a: isr & ISR_ALRAF != 0,
            alarm_b: isr & ISR_ALRBF != 0,
            tamper: isr & ISR_TAMP1F != 0,
            backup_retained: isr & ISR_INITS != 0,
        }
    }

    fn debug_link(&self) -> DebugLink {
        DebugLink::from_sense(self.vbus.is_high())
    }

    fn suspend_usb(&mut self) {
        pac::RCC.ahb2enr().modify(|w| w.0 &= !AHB2ENR_OTGFSEN);
    }

    fn enter_standby(&mut self) {
        // A flag left set masks the rising edge that wakes the chip
        unlocked(|| clear_isr(ISR_WAKE_FLAGS));
        pac::PWR
            .cr1()
            .modify(|w| w.0 |= PWR_CR_CWUF | PWR_CR_CSBF | PWR_CR_PDDS);
        set_sleepdeep(true);
        cortex_m::asm::dsb();
        loop {
            cortex_m::asm::wfi();
        }
    }
}
