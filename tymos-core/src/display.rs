//! Display manager
//!
//! Tracks the value shown on each digit position and turns time-of-day
//! changes into digit transitions.

use crate::config::{DIGIT_COUNT, DISPLAY_REFRESH_MS};
use crate::motion::{MotionEngine, MotionError};
use crate::segment::{DigitPosition, DigitValue};
use crate::traits::{ClockTime, PwmOutput, SpeedSource, TimeSource};

/// Time to digit bridge
#[derive(Debug, Clone)]
pub struct DisplayManager {
    shown: [DigitValue; DIGIT_COUNT],
    last_check_ms: Option<u32>,
}

impl DisplayManager {
    /// Create a manager for a display showing 88:88, as left by the reset
    /// choreography
    pub const fn new() -> Self {
        Self {
            shown: [DigitValue::EIGHT; DIGIT_COUNT],
            last_check_ms: None,
        }
    }

    /// Value currently shown (or queued) on a position
    pub fn shown(&self, digit: DigitPosition) -> DigitValue {
        self.shown[digit.index()]
    }

    /// Show `time` and turn the separator on
    pub fn begin<P: PwmOutput, S: SpeedSource>(
        &mut self,
        engine: &mut MotionEngine<P, S>,
        time: ClockTime,
        now_ms: u32,
    ) -> Result<(), MotionError> {
        #[cfg(feature = "defmt")]
        defmt::info!("Display starting at {}", time);

        self.last_check_ms = Some(now_ms);
        self.show_time(engine, time.hours, time.minutes, true)?;
        engine.set_separator(true, now_ms);
        Ok(())
    }

    /// Request transitions for every position whose value changes
    ///
    /// With `force`, every position is requested; unchanged positions are
    /// still no-ops in the engine. A position is recorded as showing its
    /// new value only once its transition is queued, so a full queue is
    /// retried on the next call.
    pub fn show_time<P: PwmOutput, S: SpeedSource>(
        &mut self,
        engine: &mut MotionEngine<P, S>,
        hours: u8,
        minutes: u8,
        force: bool,
    ) -> Result<(), MotionError> {
        let time = ClockTime::new(hours, minutes).ok_or(MotionError::InvalidTime)?;
        let next = digits_of(time);

        for digit in DigitPosition::ALL {
            let current = self.shown[digit.index()];
            let value = next[digit.index()];
            if force || value != current {
                engine.update_digit(digit, current, value)?;
                self.shown[digit.index()] = value;
            }
        }
        Ok(())
    }

    /// Check the time source at most once per refresh interval
    ///
    /// Returns `true` if the time source was read.
    pub fn update<P: PwmOutput, S: SpeedSource, T: TimeSource>(
        &mut self,
        engine: &mut MotionEngine<P, S>,
        time: &mut T,
        now_ms: u32,
    ) -> Result<bool, MotionError> {
        if let Some(last) = self.last_check_ms {
            if now_ms.wrapping_sub(last) < DISPLAY_REFRESH_MS {
                return Ok(false);
            }
        }

        self.last_check_ms = Some(now_ms);
        let now = time.now();
        self.show_time(engine, now.hours, now.minutes, false)?;
        Ok(true)
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Digit values of a time, left to right
fn digits_of(time: ClockTime) -> [DigitValue; DIGIT_COUNT] {
    [
        time.hours / 10,
        time.hours % 10,
        time.minutes / 10,
        time.minutes % 10,
    ]
    .map(|v| DigitValue::new(v).unwrap_or(DigitValue::EIGHT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServoConfig, SpeedProfile};
    use crate::motion::{MotionStatus, Request, REQUEST_QUEUE_CAPACITY};
    use crate::segment::separator_channel;
    use crate::testing::RecordingPwm;

    type Engine = MotionEngine<RecordingPwm, SpeedProfile>;

    fn engine() -> Engine {
        MotionEngine::new(
            RecordingPwm::default(),
            SpeedProfile::Fast,
            &ServoConfig::default(),
        )
    }

    fn digit(v: u8) -> DigitValue {
        DigitValue::new(v).unwrap()
    }

    fn shown(display: &DisplayManager) -> [u8; 4] {
        DigitPosition::ALL.map(|d| display.shown(d).value())
    }

    fn drain(engine: &mut Engine) {
        let mut now = 0;
        while let MotionStatus::Busy { resume_at_ms } = engine.poll(now) {
            now = resume_at_ms;
        }
    }

    #[test]
    fn test_digits_of() {
        let digits = digits_of(ClockTime::new(23, 59).unwrap());
        assert_eq!(digits.map(DigitValue::value), [2, 3, 5, 9]);
    }

    #[test]
    fn test_begin_shows_time_and_separator() {
        let mut engine = engine();
        let mut display = DisplayManager::new();

        display
            .begin(&mut engine, ClockTime::new(12, 8).unwrap(), 0)
            .unwrap();

        assert_eq!(shown(&display), [1, 2, 0, 8]);
        // 8 -> 8 on M2 queues nothing
        assert_eq!(engine.pending_requests(), 3);
        assert!(engine.actuator().is_driven(separator_channel()));
    }

    #[test]
    fn test_only_changed_positions_update() {
        let mut engine = engine();
        let mut display = DisplayManager::new();
        display
            .begin(&mut engine, ClockTime::new(12, 59).unwrap(), 0)
            .unwrap();
        drain(&mut engine);

        display.show_time(&mut engine, 13, 0, false).unwrap();

        // H2 2->3, M1 5->0, M2 9->0
        assert_eq!(engine.pending_requests(), 3);
        assert_eq!(shown(&display), [1, 3, 0, 0]);
    }

    #[test]
    fn test_invalid_time_rejected() {
        let mut engine = engine();
        let mut display = DisplayManager::new();

        assert_eq!(
            display.show_time(&mut engine, 24, 0, false),
            Err(MotionError::InvalidTime)
        );
        assert_eq!(
            display.show_time(&mut engine, 12, 60, true),
            Err(MotionError::InvalidTime)
        );
        assert_eq!(shown(&display), [8, 8, 8, 8]);
        assert_eq!(engine.pending_requests(), 0);
    }

    #[test]
    fn test_update_rate_limited() {
        let mut engine = engine();
        let mut display = DisplayManager::new();
        let mut clock = ClockTime::new(10, 42).unwrap();

        display.begin(&mut engine, clock, 5000).unwrap();
        drain(&mut engine);

        assert_eq!(display.update(&mut engine, &mut clock, 5999), Ok(false));
        assert_eq!(display.update(&mut engine, &mut clock, 6000), Ok(true));

        clock = ClockTime::new(10, 43).unwrap();
        assert_eq!(display.update(&mut engine, &mut clock, 6500), Ok(false));
        assert_eq!(shown(&display), [1, 0, 4, 2]);

        assert_eq!(display.update(&mut engine, &mut clock, 7000), Ok(true));
        assert_eq!(shown(&display), [1, 0, 4, 3]);
    }

    #[test]
    fn test_full_queue_is_retried() {
        let mut engine = engine();
        let mut display = DisplayManager::new();

        for _ in 0..REQUEST_QUEUE_CAPACITY - 1 {
            engine.reset_sequence().unwrap();
        }

        // Only H1 fits
        assert_eq!(
            display.show_time(&mut engine, 1, 11, false),
            Err(MotionError::QueueFull)
        );
        assert_eq!(shown(&display), [0, 8, 8, 8]);

        let mut engine = self::engine();
        display.show_time(&mut engine, 1, 11, false).unwrap();
        assert_eq!(shown(&display), [0, 1, 1, 1]);
        assert_eq!(engine.pending_requests(), 3);
    }

    #[test]
    fn test_requests_carry_shown_values() {
        let mut engine = engine();
        let mut display = DisplayManager::new();

        display.show_time(&mut engine, 8, 8, false).unwrap();
        assert_eq!(shown(&display), [0, 8, 0, 8]);
        assert_eq!(engine.pending_requests(), 2);

        let hours = Request::UpdateDigit {
            digit: DigitPosition::TensHours,
            from: digit(8),
            to: digit(0),
        };
        assert_eq!(engine.next_request(), Some(&hours));

        // Starting the first transition exposes the second
        assert!(engine.poll(0).is_busy());
        let minutes = Request::UpdateDigit {
            digit: DigitPosition::TensMinutes,
            from: digit(8),
            to: digit(0),
        };
        assert_eq!(engine.pending_requests(), 1);
        assert_eq!(engine.next_request(), Some(&minutes));
    }
}
