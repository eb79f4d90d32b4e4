//! Tamper and wake-up timer demo
//!
//! Keeps a 10 second wake-up period measured from the last boot or timer
//! wake, and also wakes on the tamper input (PC13) or the X1 pin (PA0).
//! With USB attached the cycle runs but the board stays awake.

#![no_std]
#![no_main]

use defmt::*;
use dormant_core::TamperDemo;
use dormant_firmware::board::{clock_config, Pyboard};
use dormant_firmware::config;
use embassy_executor::Spawner;
use {defmt_rtt as _, panic_probe as _};

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_stm32::init(clock_config());
    let mut board = Pyboard::new(p);

    let demo = TamperDemo::new(config::load().tamper);
    debug!("Tamper demo config: {}", demo.config());

    let report = demo
        .run(&mut board, |report| info!("Wake cycle: {}", report))
        .await;

    if report.enters_standby {
        error!("Standby entry failed after {}", report.reason);
    } else {
        info!("USB attached, staying awake; wake sources armed");
    }
}
