//! Static segment map
//!
//! Pure lookups from digit/segment identity to wiring, angles and the
//! seven-segment encoding. No state, callable from any context.

use super::{DigitPosition, DigitValue, Segment, SegmentConfig, SegmentSet};
use crate::config::{
    ANGLE_ACTIVE_INVERTED, ANGLE_ACTIVE_STANDARD, ANGLE_INTERMEDIATE_INVERTED,
    ANGLE_INTERMEDIATE_STANDARD, ANGLE_REST_INVERTED, ANGLE_REST_STANDARD, SEPARATOR_CHANNEL,
};
use crate::traits::{BoardAddress, ChannelAddress};

/// Active segments per digit value, bit 0 = segment 1
const DIGIT_SEGMENTS: [u8; 10] = [
    0b011_1111, // 0: 1 2 3 4 5 6
    0b011_0000, // 1: 5 6
    0b101_1011, // 2: 1 2 4 5 7
    0b111_1001, // 3: 1 4 5 6 7
    0b111_0100, // 4: 3 5 6 7
    0b110_1101, // 5: 1 3 4 6 7
    0b110_1111, // 6: 1 2 3 4 6 7
    0b011_1000, // 7: 4 5 6
    0b111_1111, // 8: all
    0b111_1101, // 9: 1 3 4 5 6 7
];

const STANDARD: SegmentConfig = SegmentConfig {
    active: ANGLE_ACTIVE_STANDARD,
    rest: ANGLE_REST_STANDARD,
    intermediate: None,
};

const INVERTED: SegmentConfig = SegmentConfig {
    active: ANGLE_ACTIVE_INVERTED,
    rest: ANGLE_REST_INVERTED,
    intermediate: None,
};

/// Wiring of one segment of a digit
pub const fn channel_for(digit: DigitPosition, segment: Segment) -> ChannelAddress {
    ChannelAddress::new(digit.board(), digit.bank_offset() + segment.offset())
}

/// Wiring for a raw segment number
///
/// Numbers outside 1-7 yield [`ChannelAddress::NONE`], which the actuator
/// ignores.
pub const fn channel_for_index(digit: DigitPosition, segment: u8) -> ChannelAddress {
    match Segment::new(segment) {
        Some(segment) => channel_for(digit, segment),
        None => ChannelAddress::NONE,
    }
}

/// Wiring of the separator
pub const fn separator_channel() -> ChannelAddress {
    ChannelAddress::new(BoardAddress::HOURS, SEPARATOR_CHANNEL)
}

/// Angles of a segment
///
/// Segments 3 and 6 are mounted inverted. Segments 2 and 6 carry the
/// parking angle used around a segment 7 move.
pub const fn angles_for(segment: Segment) -> SegmentConfig {
    match segment.number() {
        2 => SegmentConfig {
            intermediate: Some(ANGLE_INTERMEDIATE_STANDARD),
            ..STANDARD
        },
        3 => INVERTED,
        6 => SegmentConfig {
            intermediate: Some(ANGLE_INTERMEDIATE_INVERTED),
            ..INVERTED
        },
        _ => STANDARD,
    }
}

/// Angles of the separator (standard mounting, no parking angle)
pub const fn separator_angles() -> SegmentConfig {
    STANDARD
}

/// Segments shown for a digit value
pub const fn active_segments(value: DigitValue) -> SegmentSet {
    SegmentSet::from_bits(DIGIT_SEGMENTS[value.value() as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(numbers: &[u8]) -> SegmentSet {
        numbers.iter().copied().filter_map(Segment::new).collect()
    }

    fn digit(v: u8) -> DigitValue {
        DigitValue::new(v).unwrap()
    }

    #[test]
    fn test_digit_table() {
        let expected: [&[u8]; 10] = [
            &[1, 2, 3, 4, 5, 6],
            &[5, 6],
            &[1, 2, 4, 5, 7],
            &[1, 4, 5, 6, 7],
            &[3, 5, 6, 7],
            &[1, 3, 4, 6, 7],
            &[1, 2, 3, 4, 6, 7],
            &[4, 5, 6],
            &[1, 2, 3, 4, 5, 6, 7],
            &[1, 3, 4, 5, 6, 7],
        ];
        for (v, segments) in expected.iter().enumerate() {
            assert_eq!(active_segments(digit(v as u8)), set(segments), "digit {}", v);
        }
    }

    #[test]
    fn test_eight_is_union_of_all_digits() {
        let union = DigitValue::all()
            .filter(|d| *d != DigitValue::EIGHT)
            .map(active_segments)
            .fold(SegmentSet::EMPTY, SegmentSet::union);

        assert_eq!(union, active_segments(DigitValue::EIGHT));
        assert_eq!(active_segments(DigitValue::EIGHT), SegmentSet::FULL);
    }

    #[test]
    fn test_channel_mapping() {
        let s1 = Segment::new(1).unwrap();
        let s7 = Segment::new(7).unwrap();

        assert_eq!(
            channel_for(DigitPosition::TensHours, s1),
            ChannelAddress::new(BoardAddress::HOURS, 0)
        );
        assert_eq!(
            channel_for(DigitPosition::UnitsHours, s7),
            ChannelAddress::new(BoardAddress::HOURS, 14)
        );
        assert_eq!(
            channel_for(DigitPosition::TensMinutes, s7),
            ChannelAddress::new(BoardAddress::MINUTES, 6)
        );
        assert_eq!(
            channel_for(DigitPosition::UnitsMinutes, s1),
            ChannelAddress::new(BoardAddress::MINUTES, 8)
        );
    }

    #[test]
    fn test_channels_are_unique() {
        let mut seen: heapless::Vec<ChannelAddress, 29> = heapless::Vec::new();
        for pos in DigitPosition::ALL {
            for seg in Segment::ALL {
                seen.push(channel_for(pos, seg)).unwrap();
            }
        }
        seen.push(separator_channel()).unwrap();

        for (i, a) in seen.iter().enumerate() {
            assert!(seen[i + 1..].iter().all(|b| b != a), "duplicate {:?}", a);
        }
    }

    #[test]
    fn test_invalid_segment_index_falls_back() {
        assert_eq!(
            channel_for_index(DigitPosition::TensHours, 0),
            ChannelAddress::NONE
        );
        assert_eq!(
            channel_for_index(DigitPosition::UnitsMinutes, 8),
            ChannelAddress::NONE
        );
        assert_eq!(
            channel_for_index(DigitPosition::UnitsMinutes, 3),
            ChannelAddress::new(BoardAddress::MINUTES, 10)
        );
    }

    #[test]
    fn test_separator() {
        assert_eq!(separator_channel(), ChannelAddress::new(BoardAddress::HOURS, 15));
        assert_eq!(separator_angles().angle(true), 70);
        assert_eq!(separator_angles().angle(false), 165);
    }

    #[test]
    fn test_angles() {
        for seg in Segment::ALL {
            let cfg = angles_for(seg);
            match seg.number() {
                3 | 6 => assert_eq!((cfg.active, cfg.rest), (100, 5)),
                _ => assert_eq!((cfg.active, cfg.rest), (70, 165)),
            }
            match seg.number() {
                2 => assert_eq!(cfg.intermediate, Some(100)),
                6 => assert_eq!(cfg.intermediate, Some(70)),
                _ => assert_eq!(cfg.intermediate, None),
            }
        }
    }
}
