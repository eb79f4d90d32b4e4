//! Device drivers for the Dormant firmware
//!
//! This crate implements the `dormant-core` device traits on top of
//! `embedded-hal` 1.0 GPIO, so any chip HAL providing digital pins can
//! drive them.

#![no_std]
#![deny(unsafe_code)]

pub mod led;

pub use led::GpioLeds;
