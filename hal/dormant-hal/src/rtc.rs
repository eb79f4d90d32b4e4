//! Real-time clock abstractions
//!
//! The RTC runs from the backup supply and keeps the calendar, both alarm
//! channels and the periodic wake-up timer alive while the core is in
//! standby. Times are counted from the board epoch, 2000-01-01 00:00:00.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// First year representable by the two-digit BCD calendar
pub const EPOCH_YEAR: u16 = 2000;

/// Last year representable by the two-digit BCD calendar
pub const MAX_YEAR: u16 = 2099;

/// Longest period the wake-up timer can be programmed for (ms)
///
/// 17 bits of 1 Hz counter when the 16-bit reload register is extended.
pub const MAX_WAKEUP_MS: u32 = 131_072_000;

const SECONDS_PER_DAY: u32 = 86_400;

/// Errors from RTC operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtcError {
    /// Calendar field out of range
    InvalidDateTime,
    /// Alarm match fields out of range or conflicting
    InvalidAlarm,
    /// Wake-up period of zero or beyond [`MAX_WAKEUP_MS`]
    InvalidPeriod,
    /// Initialisation or write-access flag never came up
    Timeout,
}

/// Calendar date and time as held by the RTC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    /// Day of week, Monday = 1 ... Sunday = 7
    pub weekday: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Sub-second part in milliseconds
    #[cfg_attr(feature = "serde", serde(default))]
    pub millis: u16,
}

/// Check for a Gregorian leap year
pub fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` of `year`
pub fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Days from the epoch to January 1st of `year`
fn days_before_year(year: u16) -> u32 {
    let y = year as u32 - 1;
    let base = EPOCH_YEAR as u32 - 1;
    let leaps = (y / 4 - base / 4) - (y / 100 - base / 100) + (y / 400 - base / 400);
    365 * (year - EPOCH_YEAR) as u32 + leaps
}

impl DateTime {
    /// Create a validated date/time with zero sub-seconds
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: u16,
        month: u8,
        day: u8,
        weekday: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, RtcError> {
        let dt = Self {
            year,
            month,
            day,
            weekday,
            hour,
            minute,
            second,
            millis: 0,
        };
        dt.validate()?;
        Ok(dt)
    }

    /// Check every field against the calendar
    pub fn validate(&self) -> Result<(), RtcError> {
        if !(EPOCH_YEAR..=MAX_YEAR).contains(&self.year)
            || !(1..=12).contains(&self.month)
            || self.day == 0
            || self.day > days_in_month(self.year, self.month)
            || !(1..=7).contains(&self.weekday)
            || self.hour > 23
            || self.minute > 59
            || self.second > 59
            || self.millis > 999
        {
            return Err(RtcError::InvalidDateTime);
        }
        Ok(())
    }

    /// Days since the epoch
    pub fn epoch_days(&self) -> u32 {
        let mut days = days_before_year(self.year);
        for month in 1..self.month {
            days += days_in_month(self.year, month) as u32;
        }
        days + self.day as u32 - 1
    }

    /// Whole seconds since the epoch
    pub fn to_epoch_seconds(&self) -> u32 {
        self.epoch_days() * SECONDS_PER_DAY
            + self.hour as u32 * 3600
            + self.minute as u32 * 60
            + self.second as u32
    }

    /// Milliseconds since the epoch
    pub fn to_epoch_millis(&self) -> u64 {
        self.to_epoch_seconds() as u64 * 1000 + self.millis as u64
    }

    /// Calendar time `secs` seconds after the epoch
    pub fn from_epoch_seconds(secs: u32) -> Result<Self, RtcError> {
        let mut days = secs / SECONDS_PER_DAY;
        let rem = secs % SECONDS_PER_DAY;
        let weekday = ((days + 5) % 7 + 1) as u8;

        let mut year = EPOCH_YEAR;
        loop {
            let len = if is_leap_year(year) { 366 } else { 365 };
            if days < len {
                break;
            }
            days -= len;
            year += 1;
        }
        if year > MAX_YEAR {
            return Err(RtcError::InvalidDateTime);
        }

        let mut month = 1;
        while days >= days_in_month(year, month) as u32 {
            days -= days_in_month(year, month) as u32;
            month += 1;
        }

        Ok(Self {
            year,
            month,
            day: days as u8 + 1,
            weekday,
            hour: (rem / 3600) as u8,
            minute: (rem / 60 % 60) as u8,
            second: (rem % 60) as u8,
            millis: 0,
        })
    }

    /// Calendar time `ms` milliseconds after the epoch
    pub fn from_epoch_millis(ms: u64) -> Result<Self, RtcError> {
        let secs = u32::try_from(ms / 1000).map_err(|_| RtcError::InvalidDateTime)?;
        let dt = Self::from_epoch_seconds(secs)?;
        Ok(Self {
            millis: (ms % 1000) as u16,
            ..dt
        })
    }

    /// Day of week implied by the date (Monday = 1)
    pub fn calendar_weekday(&self) -> u8 {
        // 2000-01-01 was a Saturday
        ((self.epoch_days() + 5) % 7 + 1) as u8
    }
}

/// RTC alarm channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AlarmChannel {
    A,
    B,
}

impl AlarmChannel {
    /// Register index of the channel
    pub fn index(self) -> usize {
        match self {
            AlarmChannel::A => 0,
            AlarmChannel::B => 1,
        }
    }
}

/// Alarm match fields
///
/// Every field left as `None` is masked out of the comparison, so
/// `AlarmMatch { second: Some(39), ..Default::default() }` fires once a
/// minute, 39 seconds past.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AlarmMatch {
    /// Day of month 1..=31
    #[cfg_attr(feature = "serde", serde(default))]
    pub day: Option<u8>,
    /// Day of week 1..=7 (Monday = 1)
    #[cfg_attr(feature = "serde", serde(default))]
    pub weekday: Option<u8>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hour: Option<u8>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub minute: Option<u8>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub second: Option<u8>,
}

impl AlarmMatch {
    /// Fire once a minute at `second`
    pub const fn every_minute_at(second: u8) -> Self {
        Self {
            day: None,
            weekday: None,
            hour: None,
            minute: None,
            second: Some(second),
        }
    }

    /// Check field ranges; day and weekday cannot both be set
    pub fn validate(&self) -> Result<(), RtcError> {
        fn in_range(value: Option<u8>, lo: u8, hi: u8) -> bool {
            value.map_or(true, |v| (lo..=hi).contains(&v))
        }

        if self.day.is_some() && self.weekday.is_some() {
            return Err(RtcError::InvalidAlarm);
        }
        if !in_range(self.day, 1, 31)
            || !in_range(self.weekday, 1, 7)
            || !in_range(self.hour, 0, 23)
            || !in_range(self.minute, 0, 59)
            || !in_range(self.second, 0, 59)
        {
            return Err(RtcError::InvalidAlarm);
        }
        Ok(())
    }
}

/// Battery-backed real-time clock
pub trait RealTimeClock {
    /// Read the current calendar time
    fn now(&mut self) -> Result<DateTime, RtcError>;

    /// Set the calendar
    fn set_datetime(&mut self, datetime: &DateTime) -> Result<(), RtcError>;

    /// Program an alarm channel and enable its standby wake-up
    fn set_alarm(&mut self, channel: AlarmChannel, alarm: &AlarmMatch) -> Result<(), RtcError>;

    /// Disable an alarm channel
    fn cancel_alarm(&mut self, channel: AlarmChannel) -> Result<(), RtcError>;

    /// Program the periodic wake-up timer, or disable it with `None`
    fn set_wakeup(&mut self, period_ms: Option<u32>) -> Result<(), RtcError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_epoch_origin() {
        let dt = DateTime::new(2000, 1, 1, 6, 0, 0, 0).unwrap();
        assert_eq!(dt.to_epoch_seconds(), 0);
        assert_eq!(dt.calendar_weekday(), 6);
    }

    #[test]
    fn test_known_date() {
        // 2015-08-06 13:00:00, a Thursday
        let dt = DateTime::new(2015, 8, 6, 4, 13, 0, 0).unwrap();
        assert_eq!(dt.epoch_days(), 5696);
        assert_eq!(dt.to_epoch_seconds(), 5696 * 86_400 + 13 * 3600);
        assert_eq!(dt.calendar_weekday(), 4);
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2100));
        assert!(!is_leap_year(2015));
        assert!(DateTime::new(2024, 2, 29, 4, 0, 0, 0).is_ok());
        assert_eq!(
            DateTime::new(2023, 2, 29, 3, 0, 0, 0),
            Err(RtcError::InvalidDateTime)
        );
    }

    #[test]
    fn test_rejects_out_of_range_fields() {
        assert!(DateTime::new(1999, 1, 1, 1, 0, 0, 0).is_err());
        assert!(DateTime::new(2015, 13, 1, 1, 0, 0, 0).is_err());
        assert!(DateTime::new(2015, 4, 31, 1, 0, 0, 0).is_err());
        assert!(DateTime::new(2015, 1, 1, 0, 0, 0, 0).is_err());
        assert!(DateTime::new(2015, 1, 1, 1, 24, 0, 0).is_err());
        assert!(DateTime::new(2015, 1, 1, 1, 0, 60, 0).is_err());
        let dt = DateTime::new(2015, 1, 1, 4, 0, 0, 0).unwrap();
        assert!(DateTime { millis: 1000, ..dt }.validate().is_err());
        assert_eq!(DateTime { millis: 250, ..dt }.to_epoch_millis() % 1000, 250);
    }

    #[test]
    fn test_alarm_validation() {
        assert!(AlarmMatch::every_minute_at(39).validate().is_ok());
        assert!(AlarmMatch::every_minute_at(60).validate().is_err());
        let both = AlarmMatch {
            day: Some(1),
            weekday: Some(1),
            ..Default::default()
        };
        assert_eq!(both.validate(), Err(RtcError::InvalidAlarm));
    }

    #[test]
    fn test_channel_index() {
        assert_eq!(AlarmChannel::A.index(), 0);
        assert_eq!(AlarmChannel::B.index(), 1);
    }

    #[test]
    fn test_from_epoch_roundtrip_known_date() {
        let dt = DateTime::new(2015, 8, 6, 4, 13, 0, 39).unwrap();
        assert_eq!(DateTime::from_epoch_seconds(dt.to_epoch_seconds()), Ok(dt));
        let leap = DateTime::new(2024, 2, 29, 4, 23, 59, 59).unwrap();
        assert_eq!(DateTime::from_epoch_seconds(leap.to_epoch_seconds()), Ok(leap));
    }

    #[test]
    fn test_from_epoch_millis_keeps_subseconds() {
        let dt = DateTime::from_epoch_millis(1_234).unwrap();
        assert_eq!((dt.second, dt.millis), (1, 234));
        assert!(DateTime::from_epoch_millis(u64::MAX).is_err());
    }

    proptest! {
        #[test]
        fn prop_epoch_seconds_inverse(secs in 0u32..3_155_760_000) {
            let dt = DateTime::from_epoch_seconds(secs).unwrap();
            prop_assert!(dt.validate().is_ok());
            prop_assert_eq!(dt.to_epoch_seconds(), secs);
            prop_assert_eq!(dt.weekday, dt.calendar_weekday());
        }

        #[test]
        fn prop_next_day_adds_86400(year in 2000u16..2099, month in 1u8..=12, day in 1u8..=28) {
            let dt = DateTime::new(year, month, day, 1, 0, 0, 0).unwrap();
            let (ny, nm, nd) = if day < days_in_month(year, month) {
                (year, month, day + 1)
            } else if month < 12 {
                (year, month + 1, 1)
            } else {
                (year + 1, 1, 1)
            };
            let next = DateTime::new(ny, nm, nd, 1, 0, 0, 0).unwrap();
            prop_assert_eq!(next.to_epoch_seconds() - dt.to_epoch_seconds(), 86_400);
            prop_assert_eq!(next.calendar_weekday() % 7, (dt.calendar_weekday() % 7 + 1) % 7);
        }
    }
}
