//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in tymos-core:
//!
//! - PWM output (PCA9685 16-channel servo driver over I2C)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod pwm;
