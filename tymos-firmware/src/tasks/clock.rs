//! Clock task
//!
//! Owns the motion engine and the display manager. After the reset
//! choreography it runs the control loop:
//!
//! - poll the engine so due stages execute
//! - release idle servos
//! - refresh the displayed time
//!
//! and sleeps until the engine's next resume point.

use defmt::*;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Instant, Timer};

use tymos_core::display::DisplayManager;
use tymos_core::motion::{MotionEngine, MotionStatus};
use tymos_core::settings::Settings;
use tymos_core::traits::TimeSource;
use tymos_drivers::pwm::Pca9685;

use crate::clock::UptimeClock;

/// Longest sleep between loop iterations
pub const MAX_SLEEP_MS: u32 = 10;

/// Concrete engine type of this board
pub type Engine = MotionEngine<Pca9685<I2c<'static, I2C0, Blocking>>, Settings>;

fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

/// Sleep until `status` needs attention, at most [`MAX_SLEEP_MS`]
async fn sleep_for(status: MotionStatus, now: u32) {
    let ms = match status {
        MotionStatus::Busy { resume_at_ms } => resume_at_ms.wrapping_sub(now).min(MAX_SLEEP_MS),
        MotionStatus::Idle => MAX_SLEEP_MS,
    };
    Timer::after_millis(u64::from(ms)).await;
}

/// Clock task - reset choreography, then the control loop
#[embassy_executor::task]
pub async fn clock_task(mut engine: Engine, mut clock: UptimeClock) {
    info!("Clock task started");

    if let Err(e) = engine.reset_sequence() {
        warn!("Reset sequence not queued: {}", e);
    }
    loop {
        let now = now_ms();
        let status = engine.poll(now);
        if !status.is_busy() {
            break;
        }
        sleep_for(status, now).await;
    }

    let mut display = DisplayManager::new();
    let time = clock.now();
    if let Err(e) = display.begin(&mut engine, time, now_ms()) {
        warn!("Display start failed: {}", e);
    }

    loop {
        let now = now_ms();
        let status = engine.poll(now);
        engine.tick(now);

        if let Err(e) = display.update(&mut engine, &mut clock, now) {
            warn!("Display update failed: {}", e);
        }

        sleep_for(status, now).await;
    }
}
