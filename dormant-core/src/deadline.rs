//! Rolling wake-up deadline
//!
//! A wake cycle that starts a new period marks its origin ("save time") in
//! the last two backup RAM slots. Any later cycle computes how much of
//! the period is left, so a pin or tamper wake does not restart the timer.
//!
//! The computation is fragile by nature: a tamper event can reset the
//! calendar, putting the saved origin in the future. That case surfaces as
//! [`TimingError::OriginInFuture`] and callers substitute a fixed period
//! through [`sleep_period`].

use dormant_hal::backup::BackupRam;
use dormant_hal::rtc::RealTimeClock;

/// Backup slots taken by the saved origin
pub const ORIGIN_WORDS: usize = 2;

/// Errors computing the remaining time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingError {
    /// The saved origin lies after the current time (calendar was reset)
    OriginInFuture,
    /// The calendar could not be read
    ClockUnavailable,
    /// The saved origin could not be read or written
    OriginUnavailable,
}

/// First backup slot holding the origin for a store of `words` slots
pub const fn origin_slot(words: usize) -> usize {
    words - ORIGIN_WORDS
}

/// Milliseconds left of `period_ms` started at `origin_ms`, given `now_ms`
///
/// Returns zero once the period is over. A result that would exceed the
/// period means the clock went backwards and is reported as an error.
pub fn ms_left(origin_ms: u64, now_ms: u64, period_ms: u32) -> Result<u32, TimingError> {
    if now_ms < origin_ms {
        return Err(TimingError::OriginInFuture);
    }
    let deadline = origin_ms.saturating_add(period_ms as u64);
    Ok(deadline.saturating_sub(now_ms) as u32)
}

/// Fallback-then-clamp policy for the next wake-up period
///
/// A timing error is replaced by `fallback_ms`; the result is never below
/// `floor_ms`, which keeps very short periods from turning into a
/// busy wake loop.
pub fn sleep_period(left: Result<u32, TimingError>, fallback_ms: u32, floor_ms: u32) -> u32 {
    left.unwrap_or(fallback_ms).max(floor_ms)
}

/// Mark the start of a new period at the current time
///
/// Returns the stored origin in milliseconds since the epoch.
pub fn save_time<B>(board: &mut B) -> Result<u64, TimingError>
where
    B: RealTimeClock + BackupRam,
{
    let now = board
        .now()
        .map_err(|_| TimingError::ClockUnavailable)?
        .to_epoch_millis();
    board
        .write_u64(origin_slot(B::WORDS), now)
        .map_err(|_| TimingError::OriginUnavailable)?;
    Ok(now)
}

/// Milliseconds left of `period_ms` since the last [`save_time`]
pub fn remaining<B>(board: &mut B, period_ms: u32) -> Result<u32, TimingError>
where
    B: RealTimeClock + BackupRam,
{
    let origin = board
        .read_u64(origin_slot(B::WORDS))
        .map_err(|_| TimingError::OriginUnavailable)?;
    let now = board
        .now()
        .map_err(|_| TimingError::ClockUnavailable)?
        .to_epoch_millis();
    ms_left(origin, now, period_ms)
}
