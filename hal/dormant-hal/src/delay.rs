//! Low-power delay abstraction

use crate::power::DebugLink;

/// Blocking wait that may use a low-power CPU state
///
/// The `link` argument decides the power mode, never the duration: with
/// [`DebugLink::Detached`] an implementation may enter stop mode for the
/// duration of the wait, with [`DebugLink::Attached`] it must keep the
/// USB/debug interface clocked.
pub trait LowPowerDelay {
    /// Wait for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32, link: DebugLink) -> impl core::future::Future<Output = ()>;
}

/// Call `sleep` until `woken` reports that the expected wake source fired
///
/// A CPU sleep can end early on any event or interrupt, so a single sleep
/// is not a full wait. Returns the number of sleeps taken.
pub fn sleep_until(mut woken: impl FnMut() -> bool, mut sleep: impl FnMut()) -> u32 {
    let mut sleeps = 0;
    loop {
        sleep();
        sleeps += 1;
        if woken() {
            return sleeps;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn test_sleep_until_rides_out_early_wakes() {
        // The source fires on the fourth sleep; the first three end early
        let slept = Cell::new(0);
        let sleeps = sleep_until(|| slept.get() >= 4, || slept.set(slept.get() + 1));
        assert_eq!(sleeps, 4);
        assert_eq!(slept.get(), 4);
    }

    #[test]
    fn test_sleep_until_sleeps_at_least_once() {
        let slept = Cell::new(0);
        let sleeps = sleep_until(|| true, || slept.set(slept.get() + 1));
        assert_eq!(sleeps, 1);
        assert_eq!(slept.get(), 1);
    }
}
