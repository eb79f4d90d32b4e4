//! Dormant - wake-from-standby firmware for the pyboard
//!
//! Shared board setup and configuration loading for the two demo binaries:
//!
//! - `alarm-demo` - two RTC alarms, one LED per wake reason
//! - `tamper-demo` - wake-up timer, tamper input and X1 pin
//!
//! Both binaries run a single wake cycle from reset and end in standby.

#![no_std]

pub mod board;
pub mod config;

pub use board::Pyboard;
