//! Tymos - Servo Segment Clock Firmware
//!
//! Main firmware binary for RP2040-based boards. Two PCA9685 boards on
//! I2C0 drive the 29 segment servos; a single task owns the motion engine
//! and runs the reset choreography followed by the clock loop.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::i2c::{Config as I2cConfig, I2c};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use tymos_core::motion::MotionEngine;
use tymos_core::settings::Settings;
use tymos_core::traits::BoardAddress;
use tymos_drivers::pwm::Pca9685;

use crate::clock::UptimeClock;
use crate::config::load_config;

mod clock;
mod config;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Tymos firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    info!(
        "Servo {}-{}us @ {}Hz, speed {}, start {}",
        config.servo.min_pulse_us,
        config.servo.max_pulse_us,
        config.servo.pwm_freq_hz,
        config.speed.name(),
        config.start_time
    );

    // Setup I2C0 for the PWM boards (SDA=GPIO4, SCL=GPIO5)
    let i2c_config = {
        let mut cfg = I2cConfig::default();
        cfg.frequency = config.i2c_frequency_hz;
        cfg
    };
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);
    let mut pwm = Pca9685::new(i2c);

    let mut delay = Delay;
    for board in BoardAddress::ALL {
        if !pwm.is_connected(board) {
            warn!("PCA9685 {=u8:#x} not responding", board.0);
        }
        if let Err(e) = pwm.init(board, config.servo.pwm_freq_hz, &mut delay) {
            error!("PCA9685 {=u8:#x} init failed: {}", board.0, Debug2Format(&e));
        }
    }
    info!("PWM boards initialized");

    let engine = MotionEngine::new(pwm, Settings::new(config.speed), &config.servo);
    let clock = UptimeClock::new(config.start_time);

    spawner.spawn(tasks::clock_task(engine, clock)).unwrap();

    info!("Clock task spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
