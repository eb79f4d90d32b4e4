//! Device traits
//!
//! Chip peripherals are abstracted by `dormant-hal`; these traits cover
//! board-level devices built on top of plain GPIO.

pub mod indicator;

pub use indicator::IndicatorLeds;
