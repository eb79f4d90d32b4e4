//! Dormant Hardware Abstraction Layer
//!
//! This crate defines the traits for the chip peripherals involved in
//! leaving and re-entering standby. Chip-specific HALs implement them so
//! the same wake-cycle logic runs on any board that has a calendar RTC,
//! battery-backed RAM and a deep-sleep mode.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (dormant-firmware)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  dormant-core (wake cycle logic)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  dormant-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ dormant-hal-  │
//!             │   stm32f4     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`rtc::RealTimeClock`] - Calendar, alarm channels, periodic wake-up timer
//! - [`backup::BackupRam`] - Word storage that survives standby
//! - [`power::PowerControl`] - Wake status, debug link detection, standby entry
//! - [`tamper::TamperInput`], [`tamper::WakeupPin`] - External wake sources
//! - [`delay::LowPowerDelay`] - Waits that may drop into stop mode

#![no_std]
#![deny(unsafe_code)]

pub mod backup;
pub mod delay;
pub mod power;
pub mod rtc;
pub mod tamper;

// Re-export key traits at crate root for convenience
pub use backup::{BackupError, BackupRam};
pub use delay::{sleep_until, LowPowerDelay};
pub use power::{DebugLink, PowerControl, WakeFlags};
pub use rtc::{AlarmChannel, AlarmMatch, DateTime, RealTimeClock, RtcError};
pub use tamper::{TamperConfig, TamperError, TamperInput, TriggerLevel, WakeupPin};
