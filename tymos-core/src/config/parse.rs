//! Minimal parser for `clock.toml`
//!
//! Handles only the subset needed for the clock configuration and needs no
//! allocator. It does NOT support the full TOML spec.
//!
//! Supported:
//! - `[section]` headers (`servo`, `motion`, `clock`, `i2c`)
//! - `key = value` with integers (decimal or `0x` hex, `_` separators),
//!   quoted strings and booleans
//! - Comments (`# ...`), also trailing
//!
//! Unknown keys are ignored so older firmware accepts newer files.

use super::hardware::I2C_FREQUENCY_MAX_HZ;
use super::types::{ClockConfig, SpeedProfile};
use crate::traits::ClockTime;

/// Lowest frequency a PCA9685 prescaler can produce
const PWM_FREQ_MIN_HZ: u32 = 24;

/// Highest frequency a PCA9685 prescaler can produce
const PWM_FREQ_MAX_HZ: u32 = 1526;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Value has the wrong type or format
    InvalidValue,
    /// Value is outside its allowed range
    OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Servo,
    Motion,
    Clock,
    I2c,
}

/// Parse TOML configuration into a [`ClockConfig`]
///
/// Keys that are absent keep their defaults.
pub fn parse_config(input: &str) -> Result<ClockConfig, ParseError> {
    let mut config = ClockConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let header = header.strip_suffix(']').ok_or(ParseError::InvalidSection)?;
            section = parse_section_header(header)?;
            continue;
        }

        let (key, value) = line.split_once('=').ok_or(ParseError::InvalidLine)?;
        apply_value(&mut config, section, key.trim(), value.trim())?;
    }

    validate(&config)?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "servo" => Ok(Section::Servo),
        "motion" => Ok(Section::Motion),
        "clock" => Ok(Section::Clock),
        "i2c" => Ok(Section::I2c),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_value(
    config: &mut ClockConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Servo, "min_pulse_us") => config.servo.min_pulse_us = parse_u16(value)?,
        (Section::Servo, "max_pulse_us") => config.servo.max_pulse_us = parse_u16(value)?,
        (Section::Servo, "pwm_freq_hz") => config.servo.pwm_freq_hz = parse_u32(value)?,
        (Section::Servo, "idle_timeout_ms") => config.servo.idle_timeout_ms = parse_u32(value)?,
        (Section::Servo, "stagger_ms") => config.servo.stagger_ms = parse_u32(value)?,
        (Section::Motion, "speed") => {
            config.speed =
                SpeedProfile::from_name(parse_string(value)?).ok_or(ParseError::InvalidValue)?
        }
        (Section::Motion, "night_mode") => {
            if parse_bool(value)? {
                config.speed = SpeedProfile::Night;
            }
        }
        (Section::Clock, "start_time") => config.start_time = parse_time(parse_string(value)?)?,
        (Section::I2c, "frequency_hz") => config.i2c_frequency_hz = parse_u32(value)?,
        _ => {}
    }
    Ok(())
}

fn validate(config: &ClockConfig) -> Result<(), ParseError> {
    let servo = &config.servo;
    if servo.min_pulse_us >= servo.max_pulse_us {
        return Err(ParseError::OutOfRange);
    }
    // The full pulse must fit inside one PWM period
    let period_us = 1_000_000 / servo.pwm_freq_hz.max(1);
    if !(PWM_FREQ_MIN_HZ..=PWM_FREQ_MAX_HZ).contains(&servo.pwm_freq_hz)
        || u32::from(servo.max_pulse_us) >= period_us
    {
        return Err(ParseError::OutOfRange);
    }
    if !(1..=I2C_FREQUENCY_MAX_HZ).contains(&config.i2c_frequency_hz) {
        return Err(ParseError::OutOfRange);
    }
    Ok(())
}

/// Remove a trailing `#` comment that is not inside a quoted string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn parse_u32(value: &str) -> Result<u32, ParseError> {
    let mut digits: heapless::String<16> = heapless::String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ParseError::OutOfRange)?;
    }

    let parsed = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => digits.parse::<u32>(),
    };
    parsed.map_err(|_| ParseError::InvalidValue)
}

fn parse_u16(value: &str) -> Result<u16, ParseError> {
    u16::try_from(parse_u32(value)?).map_err(|_| ParseError::OutOfRange)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_string(value: &str) -> Result<&str, ParseError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue)
}

/// Parse "HH:MM"
fn parse_time(value: &str) -> Result<ClockTime, ParseError> {
    let (hours, minutes) = value.split_once(':').ok_or(ParseError::InvalidValue)?;
    let hours: u8 = hours.trim().parse().map_err(|_| ParseError::InvalidValue)?;
    let minutes: u8 = minutes.trim().parse().map_err(|_| ParseError::InvalidValue)?;
    ClockTime::new(hours, minutes).ok_or(ParseError::OutOfRange)
}
