//! Board-agnostic motion core for the servo segment clock
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (PWM output, speed source, time source)
//! - Segment map (wiring, angles, seven-segment encoding)
//! - Servo pulse codec and per-channel actuator with idle release
//! - Collision-avoiding transition planning
//! - Non-blocking motion engine
//! - Settings and display manager collaborators
//! - Configuration type definitions and parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod display;
pub mod motion;
pub mod segment;
pub mod servo;
pub mod settings;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;
