//! Wall-clock time source

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Time of day shown on the clock (24h)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockTime {
    /// Hours (0-23)
    pub hours: u8,
    /// Minutes (0-59)
    pub minutes: u8,
}

impl ClockTime {
    /// 12:00
    pub const NOON: Self = Self {
        hours: 12,
        minutes: 0,
    };

    /// Create a time, returning `None` if out of range
    pub const fn new(hours: u8, minutes: u8) -> Option<Self> {
        if hours < 24 && minutes < 60 {
            Some(Self { hours, minutes })
        } else {
            None
        }
    }

    /// Time `minutes` after this one, wrapping at midnight
    pub const fn add_minutes(self, minutes: u32) -> Self {
        let total = (self.hours as u32 * 60 + self.minutes as u32 + minutes % 1440) % 1440;
        Self {
            hours: (total / 60) as u8,
            minutes: (total % 60) as u8,
        }
    }
}

impl Default for ClockTime {
    fn default() -> Self {
        Self::NOON
    }
}

/// Provides the current time of day
pub trait TimeSource {
    /// Current time
    fn now(&mut self) -> ClockTime;
}

/// A frozen time
impl TimeSource for ClockTime {
    fn now(&mut self) -> ClockTime {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_range() {
        assert!(ClockTime::new(0, 0).is_some());
        assert!(ClockTime::new(23, 59).is_some());
        assert!(ClockTime::new(24, 0).is_none());
        assert!(ClockTime::new(12, 60).is_none());
    }

    #[test]
    fn test_add_minutes_wraps_midnight() {
        let t = ClockTime::new(23, 58).unwrap();
        assert_eq!(t.add_minutes(1), ClockTime::new(23, 59).unwrap());
        assert_eq!(t.add_minutes(2), ClockTime::new(0, 0).unwrap());
        assert_eq!(t.add_minutes(1440 + 63), ClockTime::new(1, 1).unwrap());
    }
}
