//! Servo control
//!
//! - [`codec`]: angle to PWM count conversion
//! - [`ramp`]: stepped motion toward a target angle
//! - [`actuator`]: per-channel writes with idle release

pub mod actuator;
pub mod codec;
pub mod ramp;

pub use actuator::{ServoActuator, ServoState};
pub use codec::{clamp_angle, PulseCodec};
pub use ramp::Ramp;
