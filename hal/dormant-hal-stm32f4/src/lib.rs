//! STM32F4-specific HAL for the Dormant firmware
//!
//! This crate implements the `dormant-hal` traits for STM32F4 chips with
//! the v2 RTC and 4KB of backup SRAM:
//!
//! - STM32F405RG (pyboard v1.x)
//!
//! embassy-stm32 has no API for RTC alarms, the wake-up timer, tamper
//! detection or standby entry, so those go straight to the PAC registers.
//! Register fields are written as raw bit masks named after the reference
//! manual (RM0090).
//!
//! # Features
//!
//! - `stm32f405rg` - Enable support for the STM32F405RG (pyboard)
//! - `defmt` - Enable debug formatting support

#![no_std]

pub mod backup;
pub mod delay;
pub mod power;
pub mod rtc;
pub mod tamper;

pub use backup::BackupSram;
pub use delay::StopDelay;
pub use power::Stm32Power;
pub use rtc::Stm32Rtc;
pub use tamper::{Tamper1, WakeupPa0};

// Re-export shared types from dormant-hal
pub use dormant_hal::{DebugLink, WakeFlags};
