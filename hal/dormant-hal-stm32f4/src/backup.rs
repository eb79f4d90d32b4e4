//! Backup SRAM driver for STM32F4
//!
//! The 4KB backup SRAM is retained in standby and on VBAT when the backup
//! regulator is on. It is exposed as 1024 32-bit words.

use dormant_hal::backup::{BackupError, BackupRam};
use embassy_stm32::pac;

use crate::rtc::PWR_CR_DBP;

/// Backup SRAM base address
pub const BKPSRAM_BASE: usize = 0x4002_4000;

/// Backup SRAM size in bytes
pub const BKPSRAM_SIZE: usize = 4 * 1024;

// RCC_AHB1ENR
const AHB1ENR_BKPSRAMEN: u32 = 1 << 18;
// PWR_CSR
const PWR_CSR_BRR: u32 = 1 << 3;
const PWR_CSR_BRE: u32 = 1 << 9;

const REGULATOR_TIMEOUT: u32 = 1_000_000;

/// Backup SRAM as word slots
pub struct BackupSram {
    regulator_ready: bool,
}

impl BackupSram {
    /// Clock the SRAM and switch on the backup regulator
    ///
    /// If the regulator never reports ready the store still works while
    /// main power is present, but contents will not survive VBAT-only
    /// operation; check [`BackupSram::is_retained`].
    pub fn new() -> Self {
        pac::PWR.cr1().modify(|w| w.0 |= PWR_CR_DBP);
        pac::RCC.ahb1enr().modify(|w| w.0 |= AHB1ENR_BKPSRAMEN);
        pac::PWR.csr1().modify(|w| w.0 |= PWR_CSR_BRE);

        let mut regulator_ready = false;
        for _ in 0..REGULATOR_TIMEOUT {
            if pac::PWR.csr1().read().0 & PWR_CSR_BRR != 0 {
                regulator_ready = true;
                break;
            }
        }

        Self { regulator_ready }
    }

    /// Check if the backup regulator is running
    pub fn is_retained(&self) -> bool {
        self.regulator_ready
    }

    fn word_ptr(slot: usize) -> Result<*mut u32, BackupError> {
        if slot >= Self::WORDS {
            return Err(BackupError::OutOfRange);
        }
        Ok((BKPSRAM_BASE + slot * 4) as *mut u32)
    }
}

impl Default for BackupSram {
    fn default() -> Self {
        Self::new()
    }
}

impl BackupRam for BackupSram {
    const WORDS: usize = BKPSRAM_SIZE / 4;

    fn read(&self, slot: usize) -> Result<u32, BackupError> {
        let ptr = Self::word_ptr(slot)?;
        // SAFETY: `ptr` is word aligned and inside the clocked backup SRAM
        Ok(unsafe { core::ptr::read_volatile(ptr) })
    }

    fn write(&mut self, slot: usize, value: u32) -> Result<(), BackupError> {
        let ptr = Self::word_ptr(slot)?;
        // SAFETY: as for `read`; DBP was set in `new`
        unsafe { core::ptr::write_volatile(ptr, value) };
        Ok(())
    }
}
