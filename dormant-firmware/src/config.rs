//! Configuration loading
//!
//! wake.toml is validated and postcard-encoded by build.rs, so decoding
//! only fails if the blob and the firmware disagree on the layout.

use defmt::*;
use dormant_core::config::DemoConfig;
use dormant_hal::BackupRam;
use dormant_hal_stm32f4::BackupSram;

/// Encoded wake.toml
const WAKE_CONFIG: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/wake.bin"));

/// Decode the embedded configuration, falling back to defaults
pub fn load() -> DemoConfig {
    let config = match DemoConfig::decode(WAKE_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            warn!("Embedded config unreadable ({}), using defaults", e);
            return DemoConfig::default();
        }
    };

    match config.validate(BackupSram::WORDS) {
        Ok(()) => config,
        Err(e) => {
            warn!("Embedded config invalid ({}), using defaults", e);
            DemoConfig::default()
        }
    }
}
