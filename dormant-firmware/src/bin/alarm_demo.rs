//! RTC alarm demo
//!
//! Sets the calendar on a cold boot and programs alarm A (every minute at
//! second 39) and alarm B (every minute at second 9). Every wake lights
//! the LED for its reason, then the board returns to standby.

#![no_std]
#![no_main]

use defmt::*;
use dormant_core::AlarmDemo;
use dormant_firmware::board::{clock_config, Pyboard};
use dormant_firmware::config;
use embassy_executor::Spawner;
use {defmt_rtt as _, panic_probe as _};

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_stm32::init(clock_config());
    let mut board = Pyboard::new(p);

    let demo = AlarmDemo::new(config::load().alarm);
    debug!("Alarm demo config: {}", demo.config());

    let report = demo
        .run(&mut board, |report| info!("Wake cycle: {}", report))
        .await;

    // Only reached if the standby request did not take
    error!("Standby entry failed after {}", report.reason);
}
