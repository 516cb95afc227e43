//! Uptime clock
//!
//! Stand-in time source until an RTC is fitted: starts at the configured
//! time and advances with the embassy uptime counter.

use embassy_time::Instant;
use tymos_core::traits::{ClockTime, TimeSource};

/// Time of day derived from uptime
pub struct UptimeClock {
    start: ClockTime,
    boot: Instant,
}

impl UptimeClock {
    /// Start counting from `start` now
    pub fn new(start: ClockTime) -> Self {
        Self {
            start,
            boot: Instant::now(),
        }
    }
}

impl TimeSource for UptimeClock {
    fn now(&mut self) -> ClockTime {
        let minutes = self.boot.elapsed().as_secs() / 60;
        self.start.add_minutes((minutes % 1440) as u32)
    }
}
