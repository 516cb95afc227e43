//! PCA9685 16-channel PWM driver (I2C)
//!
//! The PCA9685 generates 16 independent 12-bit PWM signals from an internal
//! 25 MHz oscillator. One driver instance owns the I2C bus and addresses
//! any number of boards by their 7-bit address.
//!
//! # Register Access
//!
//! Channel `n` is programmed through four registers starting at
//! `LED0_ON_L + 4 * n` (ON low/high, OFF low/high). With auto-increment
//! enabled in MODE1 one 5-byte write updates a whole channel.
//!
//! # Prescaler
//!
//! The PWM frequency can only be changed while the oscillator sleeps:
//! the driver sets SLEEP, writes PRE_SCALE, restores MODE1, waits for the
//! oscillator and then sets RESTART.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use tymos_core::traits::{BoardAddress, PwmOutput};

/// PCA9685 register addresses
pub mod reg {
    /// Mode register 1
    pub const MODE1: u8 = 0x00;
    /// Mode register 2
    pub const MODE2: u8 = 0x01;
    /// Channel 0 ON count, low byte
    pub const LED0_ON_L: u8 = 0x06;
    /// Prescaler for PWM output frequency
    pub const PRE_SCALE: u8 = 0xFE;
}

/// MODE1 bits
pub mod mode1 {
    /// Restart enabled
    pub const RESTART: u8 = 0x80;
    /// Register auto-increment
    pub const AI: u8 = 0x20;
    /// Low power mode, oscillator off
    pub const SLEEP: u8 = 0x10;
}

/// MODE2 bits
pub mod mode2 {
    /// Totem-pole outputs
    pub const OUTDRV: u8 = 0x04;
}

/// Internal oscillator frequency
pub const OSCILLATOR_HZ: u32 = 25_000_000;

/// Number of channels per board
pub const CHANNEL_COUNT: u8 = 16;

const PRESCALE_MIN: u32 = 3;
const PRESCALE_MAX: u32 = 255;

/// Prescaler value for a PWM frequency
///
/// `round(25 MHz / (4096 * freq)) - 1`, clamped to the register range.
pub const fn prescale_for(freq_hz: u32) -> u8 {
    let freq = if freq_hz == 0 { 1 } else { freq_hz };
    let divisor = freq.saturating_mul(4096);
    let value = ((OSCILLATOR_HZ + divisor / 2) / divisor).saturating_sub(1);
    let clamped = if value < PRESCALE_MIN {
        PRESCALE_MIN
    } else if value > PRESCALE_MAX {
        PRESCALE_MAX
    } else {
        value
    };
    clamped as u8
}

/// PCA9685 driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pca9685Error<E> {
    /// I2C bus error
    I2c(E),
    /// Channel above 15
    InvalidChannel(u8),
}

impl<E> From<E> for Pca9685Error<E> {
    fn from(err: E) -> Self {
        Pca9685Error::I2c(err)
    }
}

/// PCA9685 driver for one I2C bus
pub struct Pca9685<I2C> {
    i2c: I2C,
    write_errors: u32,
}

impl<I2C: I2c> Pca9685<I2C> {
    /// Create a driver on an I2C bus
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            write_errors: 0,
        }
    }

    /// Bring up a board: restart, totem-pole outputs, PWM frequency
    pub fn init<D: DelayNs>(
        &mut self,
        address: BoardAddress,
        freq_hz: u32,
        delay: &mut D,
    ) -> Result<(), Pca9685Error<I2C::Error>> {
        self.reset(address)?;
        delay.delay_ms(10);
        self.write_register(address, reg::MODE2, mode2::OUTDRV)?;
        self.set_frequency(address, freq_hz, delay)?;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "PCA9685 {=u8:#x} ready at {} Hz (prescale {})",
            address.0,
            freq_hz,
            prescale_for(freq_hz)
        );

        Ok(())
    }

    /// Program the PWM frequency
    pub fn set_frequency<D: DelayNs>(
        &mut self,
        address: BoardAddress,
        freq_hz: u32,
        delay: &mut D,
    ) -> Result<(), Pca9685Error<I2C::Error>> {
        let prescale = prescale_for(freq_hz);
        let old_mode = self.read_register(address, reg::MODE1)?;

        self.write_register(address, reg::MODE1, (old_mode & !mode1::RESTART) | mode1::SLEEP)?;
        self.write_register(address, reg::PRE_SCALE, prescale)?;
        self.write_register(address, reg::MODE1, old_mode)?;
        delay.delay_ms(5);
        self.write_register(address, reg::MODE1, old_mode | mode1::RESTART | mode1::AI)?;
        Ok(())
    }

    /// Set the on/off counts of one channel
    ///
    /// Counts are 12-bit; higher bits are masked off.
    pub fn write_channel(
        &mut self,
        address: BoardAddress,
        channel: u8,
        on: u16,
        off: u16,
    ) -> Result<(), Pca9685Error<I2C::Error>> {
        if channel >= CHANNEL_COUNT {
            return Err(Pca9685Error::InvalidChannel(channel));
        }

        let on = on & 0x0FFF;
        let off = off & 0x0FFF;
        let frame = [
            reg::LED0_ON_L + 4 * channel,
            on as u8,
            (on >> 8) as u8,
            off as u8,
            (off >> 8) as u8,
        ];
        self.i2c.write(address.0, &frame)?;
        Ok(())
    }

    /// Restart the board's oscillator
    pub fn reset(&mut self, address: BoardAddress) -> Result<(), Pca9685Error<I2C::Error>> {
        self.write_register(address, reg::MODE1, mode1::RESTART)
    }

    /// Whether a board acknowledges its address
    pub fn is_connected(&mut self, address: BoardAddress) -> bool {
        self.i2c.write(address.0, &[]).is_ok()
    }

    /// Number of failed writes through [`PwmOutput`]
    pub fn write_errors(&self) -> u32 {
        self.write_errors
    }

    /// Release the I2C bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn write_register(
        &mut self,
        address: BoardAddress,
        register: u8,
        value: u8,
    ) -> Result<(), Pca9685Error<I2C::Error>> {
        self.i2c.write(address.0, &[register, value])?;
        Ok(())
    }

    fn read_register(
        &mut self,
        address: BoardAddress,
        register: u8,
    ) -> Result<u8, Pca9685Error<I2C::Error>> {
        let mut buf = [0u8];
        self.i2c.write_read(address.0, &[register], &mut buf)?;
        Ok(buf[0])
    }
}

impl<I2C: I2c> PwmOutput for Pca9685<I2C> {
    fn set_pwm(&mut self, board: BoardAddress, channel: u8, on: u16, off: u16) {
        if let Err(_err) = self.write_channel(board, channel, on, off) {
            self.write_errors = self.write_errors.saturating_add(1);

            #[cfg(feature = "defmt")]
            defmt::warn!(
                "PCA9685 {=u8:#x} channel {} write failed ({} total)",
                board.0,
                channel,
                self.write_errors
            );
        }
    }
}
