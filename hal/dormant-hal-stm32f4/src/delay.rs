//! Low-power delay for STM32F4
//!
//! Detached from USB the wait runs in stop mode and the RTC wake-up timer
//! ends it through EXTI line 22 as an event. Attached, it is a plain
//! embassy timer wait so the USB peripheral keeps its clocks.
//!
//! The RTC wake-up timer is shared with the standby wake source: it is
//! stopped again when the delay ends, so program the standby period only
//! after the last delay.

use dormant_hal::delay::{sleep_until, LowPowerDelay};
use dormant_hal::power::DebugLink;
use embassy_stm32::pac;
use embassy_time::Timer;

use crate::power::{set_sleepdeep, PWR_CR_LPDS, PWR_CR_PDDS};
use crate::rtc::{start_wakeup, stop_wakeup, unlocked, ISR_WUTF};

/// EXTI line wired to the RTC wake-up event
const EXTI_RTC_WAKEUP: u32 = 1 << 22;

/// Stop-mode capable delay
#[derive(Default)]
pub struct StopDelay {
    _private: (),
}

impl StopDelay {
    pub fn new() -> Self {
        Self { _private: () }
    }

    fn stop_for(&mut self, ms: u32) {
        if unlocked(|| start_wakeup(ms)).is_err() {
            // Period out of range or RTC unresponsive, fall back to spinning
            cortex_m::asm::delay(ms.saturating_mul(16_000));
            return;
        }

        pac::EXTI.rtsr(0).modify(|w| w.0 |= EXTI_RTC_WAKEUP);
        pac::EXTI.emr(0).modify(|w| w.0 |= EXTI_RTC_WAKEUP);
        pac::EXTI.pr(0).write(|w| w.0 = EXTI_RTC_WAKEUP);

        pac::PWR.cr1().modify(|w| {
            w.0 = (w.0 & !PWR_CR_PDDS) | PWR_CR_LPDS;
        });
        set_sleepdeep(true);

        // Clear a pending event, then sleep until the wake-up timer fires.
        // Other events also end WFE, so keep sleeping until WUTF is set.
        cortex_m::asm::sev();
        cortex_m::asm::wfe();
        sleep_until(
            || pac::RTC.isr().read().0 & ISR_WUTF != 0,
            cortex_m::asm::wfe,
        );

        set_sleepdeep(false);
        pac::EXTI.emr(0).modify(|w| w.0 &= !EXTI_RTC_WAKEUP);
        pac::EXTI.pr(0).write(|w| w.0 = EXTI_RTC_WAKEUP);
        let _ = unlocked(stop_wakeup);
    }
}

impl LowPowerDelay for StopDelay {
    async fn delay_ms(&mut self, ms: u32, link: DebugLink) {
        match link {
            DebugLink::Attached => Timer::after_millis(ms as u64).await,
            DebugLink::Detached if ms == 0 => {}
            DebugLink::Detached => self.stop_for(ms),
        }
    }
}
