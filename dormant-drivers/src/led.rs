//! GPIO indicator LED bank
//!
//! Four active-high LEDs on individual output pins.

use dormant_core::led::Led;
use dormant_core::traits::IndicatorLeds;
use embedded_hal::digital::OutputPin;

/// Red, green, yellow and blue LEDs on GPIO pins
pub struct GpioLeds<R, G, Y, B> {
    red: R,
    green: G,
    yellow: Y,
    blue: B,
}

impl<R, G, Y, B> GpioLeds<R, G, Y, B>
where
    R: OutputPin,
    G: OutputPin,
    Y: OutputPin,
    B: OutputPin,
{
    pub fn new(red: R, green: G, yellow: Y, blue: B) -> Self {
        Self {
            red,
            green,
            yellow,
            blue,
        }
    }
}

fn drive<P: OutputPin>(pin: &mut P, on: bool) {
    // A failed LED write must not stop the wake cycle
    let _ = if on { pin.set_high() } else { pin.set_low() };
}

impl<R, G, Y, B> IndicatorLeds for GpioLeds<R, G, Y, B>
where
    R: OutputPin,
    G: OutputPin,
    Y: OutputPin,
    B: OutputPin,
{
    fn set_led(&mut self, led: Led, on: bool) {
        match led {
            Led::Red => drive(&mut self.red, on),
            Led::Green => drive(&mut self.green, on),
            Led::Yellow => drive(&mut self.yellow, on),
            Led::Blue => drive(&mut self.blue, on),
        }
    }
}
