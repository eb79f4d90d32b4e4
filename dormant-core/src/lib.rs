//! Board-agnostic core logic for the standby demonstration firmware
//!
//! This crate contains everything about a wake cycle that does not depend
//! on a specific chip:
//!
//! - Wake-reason classification from raw status bits
//! - LED patterns signalling the wake reason
//! - Deadline arithmetic for the rolling wake-up period
//! - The debounce/rearm sequence before standby
//! - The two demo programs (RTC alarms, tamper/timer)
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod deadline;
pub mod led;
pub mod program;
pub mod rearm;
pub mod traits;
pub mod wake;

#[cfg(test)]
pub(crate) mod mock;

pub use led::{Led, LedSet};
pub use program::{AlarmDemo, CycleReport, Fault, TamperDemo};
pub use wake::{classify, WakeReason};
