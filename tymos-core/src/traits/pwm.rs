//! PWM output trait
//!
//! The motion core addresses hardware as (board, channel) pairs. Every servo
//! write is funneled through a single [`PwmOutput::set_pwm`] entry point.

use crate::config::{BOARD_COUNT, PCA9685_ADDR_HOURS, PCA9685_ADDR_MINUTES};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// I2C address of a PWM driver board
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardAddress(pub u8);

impl BoardAddress {
    /// Board carrying the hours digits and the separator
    pub const HOURS: Self = Self(PCA9685_ADDR_HOURS);

    /// Board carrying the minutes digits
    pub const MINUTES: Self = Self(PCA9685_ADDR_MINUTES);

    /// All fitted boards, in slot order
    pub const ALL: [Self; BOARD_COUNT] = [Self::HOURS, Self::MINUTES];

    /// Index of this board in per-board state tables
    ///
    /// Returns `None` for addresses that are not fitted.
    pub const fn slot(self) -> Option<usize> {
        match self.0 {
            PCA9685_ADDR_HOURS => Some(0),
            PCA9685_ADDR_MINUTES => Some(1),
            _ => None,
        }
    }

    /// Board for a state-table slot
    pub const fn from_slot(slot: usize) -> Option<Self> {
        if slot < BOARD_COUNT {
            Some(Self::ALL[slot])
        } else {
            None
        }
    }
}

/// Hardware wiring coordinate of one servo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelAddress {
    /// Driver board
    pub board: BoardAddress,
    /// Channel on the board (0-15)
    pub channel: u8,
}

impl ChannelAddress {
    /// Placeholder address that maps to no board
    pub const NONE: Self = Self {
        board: BoardAddress(0),
        channel: 0,
    };

    /// Create a channel address
    pub const fn new(board: BoardAddress, channel: u8) -> Self {
        Self { board, channel }
    }
}

/// PWM output to the servo driver boards
///
/// Writes carry no status: the implementation is responsible for reporting
/// bus failures through its own channel.
pub trait PwmOutput {
    /// Set the on/off counts of one channel
    ///
    /// `on` is the count at which the pulse rises, `off` the count at which
    /// it falls. `off == 0` with `on == 0` turns the output off.
    fn set_pwm(&mut self, board: BoardAddress, channel: u8, on: u16, off: u16);
}

impl<T: PwmOutput + ?Sized> PwmOutput for &mut T {
    fn set_pwm(&mut self, board: BoardAddress, channel: u8, on: u16, off: u16) {
        (**self).set_pwm(board, channel, on, off);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_slots() {
        assert_eq!(BoardAddress::HOURS.slot(), Some(0));
        assert_eq!(BoardAddress::MINUTES.slot(), Some(1));
        assert_eq!(BoardAddress(0).slot(), None);
        assert_eq!(BoardAddress(0x42).slot(), None);
    }

    #[test]
    fn test_slot_round_trip() {
        for board in BoardAddress::ALL {
            let slot = board.slot().unwrap();
            assert_eq!(BoardAddress::from_slot(slot), Some(board));
        }
        assert_eq!(BoardAddress::from_slot(BOARD_COUNT), None);
    }

    #[test]
    fn test_placeholder_has_no_slot() {
        assert_eq!(ChannelAddress::NONE.board.slot(), None);
    }
}
