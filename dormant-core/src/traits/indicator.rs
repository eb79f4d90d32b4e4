//! Indicator LED bank trait

use crate::led::{Led, LedSet};

/// Bank of on/off indicator LEDs
///
/// No intensity control: LEDs are driven fully on or fully off.
pub trait IndicatorLeds {
    /// Switch one LED
    fn set_led(&mut self, led: Led, on: bool);

    /// Switch every LED off
    fn all_off(&mut self) {
        for led in Led::ALL {
            self.set_led(led, false);
        }
    }

    /// Light every LED in `set`, leaving the others untouched
    fn show(&mut self, set: LedSet) {
        for led in set.iter() {
            self.set_led(led, true);
        }
    }
}
