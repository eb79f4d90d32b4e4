//! Backup RAM abstraction
//!
//! Battery-backed word storage that keeps its contents across standby and
//! main power loss. Values written here are the only state that crosses
//! wake cycles, so it is modelled as an explicit device and never as a
//! process global.

/// Errors from backup RAM access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BackupError {
    /// Slot index beyond the capacity of the store
    OutOfRange,
    /// Backup domain not powered or write access not granted
    Unavailable,
}

/// Word-addressed battery-backed storage
pub trait BackupRam {
    /// Number of 32-bit slots
    const WORDS: usize;

    /// Read the word at `slot`
    fn read(&self, slot: usize) -> Result<u32, BackupError>;

    /// Write `value` to `slot`
    fn write(&mut self, slot: usize, value: u32) -> Result<(), BackupError>;

    /// Read a 64-bit value stored big-word-first in `slot` and `slot + 1`
    fn read_u64(&self, slot: usize) -> Result<u64, BackupError> {
        let hi = self.read(slot)? as u64;
        let lo = self.read(slot + 1)? as u64;
        Ok((hi << 32) | lo)
    }

    /// Write a 64-bit value big-word-first to `slot` and `slot + 1`
    fn write_u64(&mut self, slot: usize, value: u64) -> Result<(), BackupError> {
        if slot + 1 >= Self::WORDS {
            return Err(BackupError::OutOfRange);
        }
        self.write(slot, (value >> 32) as u32)?;
        self.write(slot + 1, value as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Words([u32; 4]);

    impl BackupRam for Words {
        const WORDS: usize = 4;

        fn read(&self, slot: usize) -> Result<u32, BackupError> {
            self.0.get(slot).copied().ok_or(BackupError::OutOfRange)
        }

        fn write(&mut self, slot: usize, value: u32) -> Result<(), BackupError> {
            let word = self.0.get_mut(slot).ok_or(BackupError::OutOfRange)?;
            *word = value;
            Ok(())
        }
    }

    #[test]
    fn test_u64_spans_two_slots() {
        let mut ram = Words([0; 4]);
        ram.write_u64(2, 0x0000_0012_3456_789A).unwrap();
        assert_eq!(ram.0[2], 0x12);
        assert_eq!(ram.0[3], 0x3456_789A);
        assert_eq!(ram.read_u64(2), Ok(0x0000_0012_3456_789A));
    }

    #[test]
    fn test_u64_last_slot_rejected_without_partial_write() {
        let mut ram = Words([7; 4]);
        assert_eq!(ram.write_u64(3, u64::MAX), Err(BackupError::OutOfRange));
        assert_eq!(ram.0, [7; 4]);
        assert_eq!(ram.read_u64(3), Err(BackupError::OutOfRange));
    }
}
