//! Build script for tymos-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates clock.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate clock.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=clock.toml");

    let config_path = Path::new("clock.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: clock.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a clock.toml configuration file.            ║\n\
            ║  Please create one in the tymos-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read clock.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in clock.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_servo(&config, &mut errors);
    validate_motion(&config, &mut errors);
    validate_clock(&config, &mut errors);
    validate_i2c(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in clock.toml                      ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=clock.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Only known sections, each a table
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (name, value) in root {
        if !["servo", "motion", "clock", "i2c"].contains(&name.as_str()) {
            errors.push(format!("unknown section [{}]", name));
        } else if !value.is_table() {
            errors.push(format!("[{}] must be a table", name));
        }
    }
}

/// Integer key of a section, if present
fn integer(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) -> Option<i64> {
    match config.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::Integer(v)) => Some(*v),
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
        None => None,
    }
}

/// Validate servo signal settings
fn validate_servo(config: &toml::Value, errors: &mut Vec<String>) {
    let min = integer(config, "servo", "min_pulse_us", errors).unwrap_or(500);
    let max = integer(config, "servo", "max_pulse_us", errors).unwrap_or(2500);
    let freq = integer(config, "servo", "pwm_freq_hz", errors).unwrap_or(50);

    if !(0..=u16::MAX as i64).contains(&min) || !(0..=u16::MAX as i64).contains(&max) {
        errors.push("[servo] pulse widths must be 0-65535".to_string());
    }
    if min >= max {
        errors.push("[servo] min_pulse_us must be below max_pulse_us".to_string());
    }
    if !(24..=1526).contains(&freq) {
        errors.push("[servo] pwm_freq_hz must be 24-1526".to_string());
    } else if max >= 1_000_000 / freq {
        errors.push("[servo] max_pulse_us must fit in one PWM period".to_string());
    }

    for key in ["idle_timeout_ms", "stagger_ms"] {
        if let Some(v) = integer(config, "servo", key, errors) {
            if !(0..=u32::MAX as i64).contains(&v) {
                errors.push(format!("[servo] {} must not be negative", key));
            }
        }
    }
}

/// Validate motion speed
fn validate_motion(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(motion) = config.get("motion") else {
        return;
    };

    match motion.get("speed") {
        Some(toml::Value::String(speed)) => {
            if !["fast", "normal", "night"].contains(&speed.to_ascii_lowercase().as_str()) {
                errors.push("[motion] speed must be 'fast', 'normal', or 'night'".to_string());
            }
        }
        Some(_) => errors.push("[motion] speed must be a string".to_string()),
        None => {}
    }

    if let Some(v) = motion.get("night_mode") {
        if !v.is_bool() {
            errors.push("[motion] night_mode must be true or false".to_string());
        }
    }
}

/// Validate boot time
fn validate_clock(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(start) = config.get("clock").and_then(|c| c.get("start_time")) else {
        return;
    };

    let valid = start
        .as_str()
        .and_then(|s| s.split_once(':'))
        .and_then(|(h, m)| Some((h.trim().parse::<u8>().ok()?, m.trim().parse::<u8>().ok()?)))
        .is_some_and(|(h, m)| h < 24 && m < 60);

    if !valid {
        errors.push("[clock] start_time must be \"HH:MM\" (00:00-23:59)".to_string());
    }
}

/// Validate I2C bus clock
fn validate_i2c(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(freq) = integer(config, "i2c", "frequency_hz", errors) {
        if !(1..=1_000_000).contains(&freq) {
            errors.push("[i2c] frequency_hz must be 1-1000000".to_string());
        }
    }
}
