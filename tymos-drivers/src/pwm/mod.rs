//! PWM drivers

pub mod pca9685;

pub use pca9685::{Pca9685, Pca9685Error};
