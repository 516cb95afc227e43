//! Segment model
//!
//! Identity types for the fixed clock topology (four digit positions of
//! seven segments each, plus a separator) and the static wiring and angle
//! lookup in [`map`].

pub mod map;

pub use map::{
    active_segments, angles_for, channel_for, channel_for_index, separator_angles,
    separator_channel,
};

use crate::config::{DIGIT_COUNT, SEGMENTS_PER_DIGIT, UNITS_BANK_OFFSET};
use crate::traits::BoardAddress;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the four digit slots, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DigitPosition {
    TensHours,
    UnitsHours,
    TensMinutes,
    UnitsMinutes,
}

impl DigitPosition {
    /// All positions, left to right
    pub const ALL: [Self; DIGIT_COUNT] = [
        Self::TensHours,
        Self::UnitsHours,
        Self::TensMinutes,
        Self::UnitsMinutes,
    ];

    /// Zero-based index, left to right
    pub const fn index(self) -> usize {
        match self {
            Self::TensHours => 0,
            Self::UnitsHours => 1,
            Self::TensMinutes => 2,
            Self::UnitsMinutes => 3,
        }
    }

    /// Driver board carrying this digit
    pub const fn board(self) -> BoardAddress {
        match self {
            Self::TensHours | Self::UnitsHours => BoardAddress::HOURS,
            Self::TensMinutes | Self::UnitsMinutes => BoardAddress::MINUTES,
        }
    }

    /// First channel of this digit's bank on its board
    pub const fn bank_offset(self) -> u8 {
        match self {
            Self::TensHours | Self::TensMinutes => 0,
            Self::UnitsHours | Self::UnitsMinutes => UNITS_BANK_OFFSET,
        }
    }

    /// Short label used in logs
    pub const fn label(self) -> &'static str {
        match self {
            Self::TensHours => "H1",
            Self::UnitsHours => "H2",
            Self::TensMinutes => "M1",
            Self::UnitsMinutes => "M2",
        }
    }
}

/// A segment of a digit, numbered 1-7
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segment(u8);

impl Segment {
    /// Upper-left flap of the collision pair
    pub const PAIR_UPPER: Self = Self(2);

    /// Lower-right flap of the collision pair
    pub const PAIR_LOWER: Self = Self(6);

    /// The segment whose travel crosses the collision pair
    pub const CONFLICT: Self = Self(7);

    /// All segments in ascending order
    pub const ALL: [Self; SEGMENTS_PER_DIGIT] = [
        Self(1),
        Self(2),
        Self(3),
        Self(4),
        Self(5),
        Self(6),
        Self(7),
    ];

    /// Create a segment, returning `None` outside 1-7
    pub const fn new(number: u8) -> Option<Self> {
        if number >= 1 && number as usize <= SEGMENTS_PER_DIGIT {
            Some(Self(number))
        } else {
            None
        }
    }

    /// Segment number (1-7)
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Zero-based offset within the digit bank
    pub const fn offset(self) -> u8 {
        self.0 - 1
    }

    /// Bit of this segment in a [`SegmentSet`]
    pub const fn mask(self) -> u8 {
        1 << (self.0 - 1)
    }
}

/// A displayable digit value (0-9)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DigitValue(u8);

impl DigitValue {
    /// The all-segments digit shown after reset
    pub const EIGHT: Self = Self(8);

    /// Create a digit value, returning `None` above 9
    pub const fn new(value: u8) -> Option<Self> {
        if value <= 9 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Numeric value
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Iterate 0 through 9
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=9).map(Self)
    }
}

/// Set of segments, one bit per segment (bit 0 = segment 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentSet(u8);

impl SegmentSet {
    /// No segments
    pub const EMPTY: Self = Self(0);

    /// All seven segments
    pub const FULL: Self = Self(0x7F);

    /// Build from a raw bitmask, dropping bits above segment 7
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::FULL.0)
    }

    /// Raw bitmask
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether `segment` is in the set
    pub const fn contains(self, segment: Segment) -> bool {
        self.0 & segment.mask() != 0
    }

    /// Set with `segment` added
    pub const fn with(self, segment: Segment) -> Self {
        Self(self.0 | segment.mask())
    }

    /// Segments in either set
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Segments whose membership differs between the two sets
    pub const fn changed(self, other: Self) -> Self {
        Self(self.0 ^ other.0)
    }

    /// Segments in `self` but not in `other`
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Number of segments in the set
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set is empty
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in ascending order
    pub fn iter(self) -> impl Iterator<Item = Segment> {
        Segment::ALL.into_iter().filter(move |s| self.contains(*s))
    }
}

impl FromIterator<Segment> for SegmentSet {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

/// Angles of one segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentConfig {
    /// Angle when the segment is shown
    pub active: i16,
    /// Angle when the segment is hidden
    pub rest: i16,
    /// Parking angle used only by the collision sequence
    pub intermediate: Option<i16>,
}

impl SegmentConfig {
    /// Angle for the given membership
    pub const fn angle(&self, active: bool) -> i16 {
        if active {
            self.active
        } else {
            self.rest
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_range() {
        assert!(Segment::new(0).is_none());
        assert!(Segment::new(8).is_none());
        for n in 1..=7 {
            assert_eq!(Segment::new(n).unwrap().number(), n);
        }
    }

    #[test]
    fn test_digit_value_range() {
        assert!(DigitValue::new(9).is_some());
        assert!(DigitValue::new(10).is_none());
        assert_eq!(DigitValue::all().count(), 10);
    }

    #[test]
    fn test_position_indices_follow_display_order() {
        for (i, pos) in DigitPosition::ALL.into_iter().enumerate() {
            assert_eq!(pos.index(), i);
        }
    }

    #[test]
    fn test_segment_set_operations() {
        let a: SegmentSet = [1, 2, 3].into_iter().filter_map(Segment::new).collect();
        let b: SegmentSet = [3, 4].into_iter().filter_map(Segment::new).collect();

        assert_eq!(a.bits(), 0b0000_0111);
        assert_eq!(a.union(b).bits(), 0b0000_1111);
        assert_eq!(a.changed(b).bits(), 0b0000_1011);
        assert_eq!(a.difference(b).bits(), 0b0000_0011);
        assert_eq!(a.len(), 3);
        assert!(SegmentSet::EMPTY.is_empty());
        assert_eq!(SegmentSet::from_bits(0xFF), SegmentSet::FULL);
    }

    #[test]
    fn test_segment_set_iter_ascending() {
        let set = SegmentSet::from_bits(0b0100_0101);
        let numbers: heapless::Vec<u8, 7> = set.iter().map(Segment::number).collect();
        assert_eq!(numbers.as_slice(), &[1, 3, 7]);
    }
}
