//! Configuration loading
//!
//! The configuration is embedded from `clock.toml` at build time (and
//! validated by `build.rs`). It is parsed with the no_std parser from
//! tymos-core.

use defmt::*;
use tymos_core::config::{parse_config, ClockConfig};

/// Embedded configuration (compiled into firmware)
/// Edit clock.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../clock.toml");

/// Load the embedded configuration
///
/// Falls back to the built-in defaults if the file does not parse.
pub fn load_config() -> ClockConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            // build.rs rejects invalid files, so this only happens when the
            // two validators disagree
            error!("Failed to parse embedded config: {}", e);
            error!("Using default configuration");
            ClockConfig::default()
        }
    }
}
