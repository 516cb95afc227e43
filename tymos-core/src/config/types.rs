//! Configuration type definitions
//!
//! These types represent the clock configuration, loaded from `clock.toml`
//! by the firmware or built from defaults.

use super::hardware::*;
use crate::traits::ClockTime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Motion speed profile
///
/// All profiles move in the same angular increment and differ only in the
/// pause between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpeedProfile {
    /// 5° every 10ms
    Fast,
    /// 5° every 50ms
    #[default]
    Normal,
    /// 5° every 100ms (quiet)
    Night,
}

impl SpeedProfile {
    /// Pause between ramp steps
    pub const fn step_delay_ms(self) -> u32 {
        match self {
            SpeedProfile::Fast => SPEED_FAST_DELAY_MS,
            SpeedProfile::Normal => SPEED_NORMAL_DELAY_MS,
            SpeedProfile::Night => SPEED_NIGHT_DELAY_MS,
        }
    }

    /// Lowercase name as used in `clock.toml`
    pub const fn name(self) -> &'static str {
        match self {
            SpeedProfile::Fast => "fast",
            SpeedProfile::Normal => "normal",
            SpeedProfile::Night => "night",
        }
    }

    /// Parse a profile name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        [SpeedProfile::Fast, SpeedProfile::Normal, SpeedProfile::Night]
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }
}

/// Servo signal and timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ServoConfig {
    /// Pulse width at 0° (µs)
    pub min_pulse_us: u16,
    /// Pulse width at 180° (µs)
    pub max_pulse_us: u16,
    /// PWM frequency (Hz)
    pub pwm_freq_hz: u32,
    /// Idle time before a channel's signal is released (ms)
    pub idle_timeout_ms: u32,
    /// Gap between consecutive segment moves (ms)
    pub stagger_ms: u32,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            min_pulse_us: SERVO_MIN_PULSE_US,
            max_pulse_us: SERVO_MAX_PULSE_US,
            pwm_freq_hz: PWM_FREQ_HZ,
            idle_timeout_ms: IDLE_TIMEOUT_MS,
            stagger_ms: STAGGER_DELAY_MS,
        }
    }
}

/// Complete clock configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockConfig {
    /// Servo signal and timing
    pub servo: ServoConfig,
    /// Speed profile selected at boot
    pub speed: SpeedProfile,
    /// Time shown at boot when no time source is fitted
    pub start_time: ClockTime,
    /// I2C bus clock (Hz)
    pub i2c_frequency_hz: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            servo: ServoConfig::default(),
            speed: SpeedProfile::default(),
            start_time: ClockTime::NOON,
            i2c_frequency_hz: I2C_FREQUENCY_HZ,
        }
    }
}
