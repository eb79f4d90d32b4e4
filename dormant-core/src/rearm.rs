//! Debounce and rearm sequencing
//!
//! A wake source must be physically released before it is armed again,
//! otherwise the chip wakes straight back up. The order is always: let the
//! LEDs be seen, wait out the tamper line, wait out the wake-up pin, then
//! let contact bounce settle.

use dormant_hal::delay::LowPowerDelay;
use dormant_hal::power::DebugLink;
use dormant_hal::tamper::{TamperInput, WakeupPin};

/// Delays and poll interval of the release sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReleaseTiming {
    /// How long the wake-reason LEDs stay visible
    pub show_ms: u32,
    /// Sleep between polls of a line that is still active
    pub poll_ms: u32,
    /// Final wait for contact bounce
    pub settle_ms: u32,
}

/// Wait, sleeping `poll_ms` between polls, until `active` reads false
///
/// Returns the number of polls that found the line still active.
pub async fn wait_inactive<B, F>(board: &mut B, active: F, poll_ms: u32, link: DebugLink) -> u32
where
    B: LowPowerDelay,
    F: Fn(&B) -> bool,
{
    let mut polls = 0;
    while active(&*board) {
        polls += 1;
        board.delay_ms(poll_ms, link).await;
    }
    polls
}

/// Show the LEDs, wait for both wake lines to clear, then debounce
pub async fn release_wake_lines<B>(board: &mut B, timing: &ReleaseTiming, link: DebugLink)
where
    B: LowPowerDelay + TamperInput + WakeupPin,
{
    board.delay_ms(timing.show_ms, link).await;
    wait_inactive(board, |b: &B| b.tamper_active(), timing.poll_ms, link).await;
    wait_inactive(board, |b: &B| b.wakeup_active(), timing.poll_ms, link).await;
    board.delay_ms(timing.settle_ms, link).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockBoard, Op, MOCK_START_MS};
    use embassy_futures::block_on;

    const TIMING: ReleaseTiming = ReleaseTiming {
        show_ms: 500,
        poll_ms: 50,
        settle_ms: 50,
    };

    #[test]
    fn test_wait_inactive_counts_active_polls() {
        let mut board = MockBoard::new();
        board.tamper_held.set(3);
        let polls = block_on(wait_inactive(
            &mut board,
            |b: &MockBoard| b.tamper_active(),
            50,
            DebugLink::Detached,
        ));
        assert_eq!(polls, 3);
        assert_eq!(board.now_ms - MOCK_START_MS, 150);
    }

    #[test]
    fn test_release_order() {
        let mut board = MockBoard::new();
        board.tamper_held.set(1);
        board.wakeup_held.set(1);
        block_on(release_wake_lines(&mut board, &TIMING, DebugLink::Detached));

        let expected = [
            Op::Delay(500, DebugLink::Detached),
            Op::TamperPoll(true),
            Op::Delay(50, DebugLink::Detached),
            Op::TamperPoll(false),
            Op::WakeupPoll(true),
            Op::Delay(50, DebugLink::Detached),
            Op::WakeupPoll(false),
            Op::Delay(50, DebugLink::Detached),
        ];
        assert_eq!(board.ops().as_slice(), &expected);
    }

    #[test]
    fn test_link_threaded_through_every_wait() {
        let mut board = MockBoard::new();
        board.tamper_held.set(2);
        block_on(release_wake_lines(&mut board, &TIMING, DebugLink::Attached));
        assert!(board
            .ops()
            .iter()
            .filter_map(|op| match op {
                Op::Delay(_, link) => Some(*link),
                _ => None,
            })
            .all(|link| link == DebugLink::Attached));
    }
}
