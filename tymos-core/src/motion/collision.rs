//! Collision-avoiding transitions
//!
//! Segments 2 and 6 share travel space with segment 7. Whenever a
//! transition changes segment 7, it is planned in four strictly ordered
//! phases:
//!
//! 1. Changed segments among 1, 3, 4 and 5 move to their final angle,
//!    staggered.
//! 2. Segments 2 and 6 move together to an interim angle: their parking
//!    angle if they end up shown, otherwise rest.
//! 3. Segment 7 moves to its final angle.
//! 4. If either of 2 and 6 parked, both move together to their final angle.
//!
//! Neither 2 nor 6 reaches its shown angle before segment 7 has arrived.

use super::plan::Plan;
use super::MotionError;
use crate::segment::{
    active_segments, angles_for, channel_for, DigitPosition, DigitValue, Segment, SegmentSet,
};
use crate::servo::Ramp;

/// Segments moved before the collision pair
const CLEAR_SEGMENTS: [u8; 4] = [1, 3, 4, 5];

/// Plans transitions that move the conflict segment
#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionResolver;

impl CollisionResolver {
    /// Whether `from -> to` changes segment 7 and needs the ordered sequence
    pub const fn needs_collision_logic(from: DigitValue, to: DigitValue) -> bool {
        let changed = active_segments(from).changed(active_segments(to));
        changed.contains(Segment::CONFLICT)
    }

    /// Append the four-phase sequence for `from -> to` to `plan`
    pub fn plan_sequence(
        digit: DigitPosition,
        from: DigitValue,
        to: DigitValue,
        step_delay_ms: u32,
        stagger_ms: u32,
        plan: &mut Plan,
    ) -> Result<(), MotionError> {
        let before = active_segments(from);
        let after = active_segments(to);
        let changed = before.changed(after);

        // Phase 1
        for segment in CLEAR_SEGMENTS.into_iter().filter_map(Segment::new) {
            if changed.contains(segment) {
                let cfg = angles_for(segment);
                plan.push_move(
                    channel_for(digit, segment),
                    cfg.angle(before.contains(segment)),
                    cfg.angle(after.contains(segment)),
                    step_delay_ms,
                )?;
                plan.push_pause(stagger_ms)?;
            }
        }

        // Phase 2
        let upper = PairMove::new(digit, Segment::PAIR_UPPER, before, after);
        let lower = PairMove::new(digit, Segment::PAIR_LOWER, before, after);
        plan.push_pair(upper.to_interim(), lower.to_interim(), step_delay_ms)?;

        // Phase 3
        let cfg = angles_for(Segment::CONFLICT);
        plan.push_move(
            channel_for(digit, Segment::CONFLICT),
            cfg.angle(before.contains(Segment::CONFLICT)),
            cfg.angle(after.contains(Segment::CONFLICT)),
            step_delay_ms,
        )?;

        // Phase 4
        if upper.parks() || lower.parks() {
            plan.push_pair(upper.to_final(), lower.to_final(), step_delay_ms)?;
        }

        Ok(())
    }
}

/// Angles one of segments 2 and 6 passes through
#[derive(Debug, Clone, Copy)]
struct PairMove {
    segment: Segment,
    digit: DigitPosition,
    start: i16,
    interim: i16,
    target: i16,
}

impl PairMove {
    fn new(digit: DigitPosition, segment: Segment, before: SegmentSet, after: SegmentSet) -> Self {
        let cfg = angles_for(segment);
        let shown = after.contains(segment);
        let interim = match cfg.intermediate {
            Some(parking) if shown => parking,
            _ => cfg.rest,
        };

        Self {
            segment,
            digit,
            start: cfg.angle(before.contains(segment)),
            interim,
            target: cfg.angle(shown),
        }
    }

    fn parks(&self) -> bool {
        self.interim != self.target
    }

    fn to_interim(self) -> Ramp {
        Ramp::new(channel_for(self.digit, self.segment), self.start, self.interim)
    }

    fn to_final(self) -> Ramp {
        Ramp::new(channel_for(self.digit, self.segment), self.interim, self.target)
    }
}
