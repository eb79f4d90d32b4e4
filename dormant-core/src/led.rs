//! Indicator LEDs and wake-reason patterns
//!
//! The pyboard numbers its LEDs 1 to 4 as red, green, yellow, blue. The
//! blue LED shares a timer with PWM output, so the tamper demo never
//! uses it.

use crate::wake::WakeReason;

/// Board indicator LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Led {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Led {
    /// All LEDs in board order
    pub const ALL: [Led; 4] = [Led::Red, Led::Green, Led::Yellow, Led::Blue];

    fn bit(self) -> u8 {
        match self {
            Led::Red => 1 << 0,
            Led::Green => 1 << 1,
            Led::Yellow => 1 << 2,
            Led::Blue => 1 << 3,
        }
    }
}

/// Set of lit LEDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedSet(u8);

impl LedSet {
    /// No LEDs
    pub const EMPTY: LedSet = LedSet(0);

    /// Set containing exactly `led`
    pub fn only(led: Led) -> Self {
        LedSet(led.bit())
    }

    /// Set containing both LEDs
    pub fn pair(a: Led, b: Led) -> Self {
        LedSet(a.bit() | b.bit())
    }

    pub fn insert(&mut self, led: Led) {
        self.0 |= led.bit();
    }

    pub fn remove(&mut self, led: Led) {
        self.0 &= !led.bit();
    }

    pub fn contains(&self, led: Led) -> bool {
        self.0 & led.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Lit LEDs in board order
    pub fn iter(self) -> impl Iterator<Item = Led> {
        Led::ALL.into_iter().filter(move |led| self.contains(*led))
    }
}

/// LED pattern of the RTC alarm demo: one LED per reason
pub fn alarm_pattern(reason: WakeReason) -> LedSet {
    match reason {
        WakeReason::Boot => LedSet::only(Led::Red),
        WakeReason::PowerUp => LedSet::only(Led::Blue),
        WakeReason::AlarmA => LedSet::only(Led::Green),
        WakeReason::AlarmB => LedSet::only(Led::Yellow),
        _ => LedSet::EMPTY,
    }
}

/// LED pattern of the tamper/timer demo
pub fn tamper_pattern(reason: WakeReason) -> LedSet {
    match reason {
        WakeReason::Boot => LedSet::only(Led::Yellow),
        WakeReason::Wakeup => LedSet::pair(Led::Green, Led::Yellow),
        WakeReason::Tamper => LedSet::only(Led::Red),
        WakeReason::X1 => LedSet::pair(Led::Red, Led::Green),
        _ => LedSet::EMPTY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_operations() {
        let mut set = LedSet::EMPTY;
        assert!(set.is_empty());
        set.insert(Led::Yellow);
        set.insert(Led::Red);
        set.insert(Led::Red);
        set.insert(Led::Blue);
        set.remove(Led::Blue);
        assert_eq!(set.len(), 2);
        assert!(set.contains(Led::Red));
        assert!(!set.contains(Led::Blue));

        let mut order = set.iter();
        assert_eq!(order.next(), Some(Led::Red));
        assert_eq!(order.next(), Some(Led::Yellow));
        assert_eq!(order.next(), None);
        assert_eq!(set, LedSet::pair(Led::Yellow, Led::Red));
    }

    #[test]
    fn test_alarm_pattern_lights_exactly_one() {
        let cases = [
            (WakeReason::Boot, Led::Red),
            (WakeReason::PowerUp, Led::Blue),
            (WakeReason::AlarmA, Led::Green),
            (WakeReason::AlarmB, Led::Yellow),
        ];
        for (reason, led) in cases {
            let set = alarm_pattern(reason);
            assert_eq!(set.len(), 1);
            assert!(set.contains(led));
        }
        assert!(alarm_pattern(WakeReason::Tamper).is_empty());
        assert!(alarm_pattern(WakeReason::Unknown).is_empty());
    }

    #[test]
    fn test_tamper_pattern() {
        assert_eq!(tamper_pattern(WakeReason::Boot), LedSet::only(Led::Yellow));
        assert_eq!(
            tamper_pattern(WakeReason::Wakeup),
            LedSet::pair(Led::Green, Led::Yellow)
        );
        assert_eq!(tamper_pattern(WakeReason::Tamper), LedSet::only(Led::Red));
        assert_eq!(
            tamper_pattern(WakeReason::X1),
            LedSet::pair(Led::Red, Led::Green)
        );
        assert!(tamper_pattern(WakeReason::Unknown).is_empty());
        assert!(tamper_pattern(WakeReason::PowerUp).is_empty());
        assert!(tamper_pattern(WakeReason::AlarmA).is_empty());
    }

    #[test]
    fn test_tamper_pattern_never_uses_blue() {
        let reasons = [
            WakeReason::Boot,
            WakeReason::PowerUp,
            WakeReason::AlarmA,
            WakeReason::AlarmB,
            WakeReason::Wakeup,
            WakeReason::Tamper,
            WakeReason::X1,
            WakeReason::Unknown,
        ];
        for reason in reasons {
            assert!(!tamper_pattern(reason).contains(Led::Blue));
        }
    }
}
