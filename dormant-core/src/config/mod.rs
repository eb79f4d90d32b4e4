//! Configuration types
//!
//! Board-agnostic settings for both demo programs. The firmware embeds
//! them as postcard binary data produced from `wake.toml` at build time.

pub mod types;

pub use types::*;
