//! Angle/PWM codec
//!
//! Converts a logical angle into the 12-bit off-count of a PWM channel.
//! The conversion is pure integer arithmetic and bit-reproducible: the
//! pulse width is interpolated linearly (truncating) between the
//! configured limits, then scaled to counts of one PWM period.

use crate::config::{ServoConfig, ANGLE_MAX, ANGLE_MIN, PWM_RESOLUTION};

/// Clamp an angle to the commandable range
pub const fn clamp_angle(angle: i16) -> i16 {
    if angle < ANGLE_MIN {
        ANGLE_MIN
    } else if angle > ANGLE_MAX {
        ANGLE_MAX
    } else {
        angle
    }
}

/// Angle to pulse converter for one servo signal configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseCodec {
    min_pulse_us: i32,
    max_pulse_us: i32,
    period_us: i32,
}

impl PulseCodec {
    /// Create a codec
    ///
    /// A zero frequency is treated as 1 Hz. The period never drops below
    /// 1 µs, so frequencies above 1 MHz saturate every pulse to full scale.
    pub const fn new(min_pulse_us: u16, max_pulse_us: u16, pwm_freq_hz: u32) -> Self {
        let freq = if pwm_freq_hz == 0 { 1 } else { pwm_freq_hz };
        let period = 1_000_000 / freq;
        Self {
            min_pulse_us: min_pulse_us as i32,
            max_pulse_us: max_pulse_us as i32,
            period_us: if period == 0 { 1 } else { period as i32 },
        }
    }

    /// Create a codec from the servo configuration
    pub const fn from_config(config: &ServoConfig) -> Self {
        Self::new(config.min_pulse_us, config.max_pulse_us, config.pwm_freq_hz)
    }

    /// PWM period in microseconds
    pub const fn period_us(&self) -> u32 {
        self.period_us as u32
    }

    /// Pulse width in microseconds for an angle (clamped)
    pub const fn pulse_us(&self, angle: i16) -> i32 {
        let angle = clamp_angle(angle) as i32;
        let span = (ANGLE_MAX - ANGLE_MIN) as i32;
        (angle - ANGLE_MIN as i32) * (self.max_pulse_us - self.min_pulse_us) / span
            + self.min_pulse_us
    }

    /// Off-count for an angle (clamped)
    pub const fn pulse(&self, angle: i16) -> u16 {
        let counts = self.pulse_us(angle) * PWM_RESOLUTION as i32 / self.period_us;
        let max = (PWM_RESOLUTION - 1) as i32;
        if counts < 0 {
            0
        } else if counts > max {
            max as u16
        } else {
            counts as u16
        }
    }
}

impl Default for PulseCodec {
    fn default() -> Self {
        Self::from_config(&ServoConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_pulses() {
        let codec = PulseCodec::default();

        assert_eq!(codec.period_us(), 20_000);
        assert_eq!(codec.pulse(0), 102);
        assert_eq!(codec.pulse(5), 113);
        assert_eq!(codec.pulse(70), 261);
        assert_eq!(codec.pulse(90), 307);
        assert_eq!(codec.pulse(100), 329);
        assert_eq!(codec.pulse(165), 477);
        assert_eq!(codec.pulse(180), 512);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let codec = PulseCodec::default();

        assert_eq!(codec.pulse(-45), codec.pulse(0));
        assert_eq!(codec.pulse(270), codec.pulse(180));
        assert_eq!(codec.pulse(i16::MIN), 102);
        assert_eq!(codec.pulse(i16::MAX), 512);
    }

    #[test]
    fn test_custom_range() {
        let codec = PulseCodec::new(1000, 2000, 50);

        assert_eq!(codec.pulse_us(0), 1000);
        assert_eq!(codec.pulse_us(90), 1500);
        assert_eq!(codec.pulse_us(180), 2000);
    }

    #[test]
    fn test_extreme_frequencies() {
        let fast = PulseCodec::new(500, 2500, 2_000_000);
        assert_eq!(fast.period_us(), 1);
        assert_eq!(fast.pulse(0), (PWM_RESOLUTION - 1) as u16);
        assert_eq!(fast.pulse(180), (PWM_RESOLUTION - 1) as u16);

        let stopped = PulseCodec::new(500, 2500, 0);
        assert_eq!(stopped.period_us(), 1_000_000);
        assert_eq!(stopped.pulse(180), 10);
    }

    proptest! {
        #[test]
        fn test_pulse_monotonic(a in 0i16..=180, b in 0i16..=180) {
            let codec = PulseCodec::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(codec.pulse(lo) <= codec.pulse(hi));
        }

        #[test]
        fn test_clamp_idempotent(angle in any::<i16>()) {
            let codec = PulseCodec::default();
            prop_assert_eq!(codec.pulse(clamp_angle(angle)), codec.pulse(angle));
            prop_assert_eq!(clamp_angle(clamp_angle(angle)), clamp_angle(angle));
        }
    }
}
