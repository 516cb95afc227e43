//! Stepped ramp toward a target angle
//!
//! A ramp moves in fixed increments and lands exactly on its target: the
//! last step is shortened rather than overshooting.

use crate::traits::ChannelAddress;

/// Motion of one channel from a start angle to a target angle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ramp {
    channel: ChannelAddress,
    current: i16,
    target: i16,
}

impl Ramp {
    /// Create a ramp; `from == to` is already complete
    pub const fn new(channel: ChannelAddress, from: i16, to: i16) -> Self {
        Self {
            channel,
            current: from,
            target: to,
        }
    }

    /// Channel being moved
    pub const fn channel(&self) -> ChannelAddress {
        self.channel
    }

    /// Last commanded (or starting) angle
    pub const fn current(&self) -> i16 {
        self.current
    }

    /// Final angle
    pub const fn target(&self) -> i16 {
        self.target
    }

    /// Whether the target has been reached
    pub const fn is_done(&self) -> bool {
        self.current == self.target
    }

    /// Advance one step of `step` degrees
    ///
    /// Returns the new angle to command, or `None` if already at target.
    pub fn advance(&mut self, step: i16) -> Option<i16> {
        if self.is_done() {
            return None;
        }

        let step = step.max(1);
        self.current = if self.target > self.current {
            self.current.saturating_add(step).min(self.target)
        } else {
            self.current.saturating_sub(step).max(self.target)
        };
        Some(self.current)
    }

    /// Number of steps (writes) still needed
    pub fn remaining_steps(&self, step: i16) -> u32 {
        let distance = (i32::from(self.target) - i32::from(self.current)).unsigned_abs();
        let step = step.max(1) as u32;
        distance.div_ceil(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::STEP_DEGREES;

    fn ramp(from: i16, to: i16) -> Ramp {
        Ramp::new(ChannelAddress::NONE, from, to)
    }

    fn collect(mut r: Ramp) -> Vec<i16> {
        core::iter::from_fn(|| r.advance(STEP_DEGREES)).collect()
    }

    #[test]
    fn test_equal_angles_is_noop() {
        let mut r = ramp(70, 70);
        assert!(r.is_done());
        assert_eq!(r.advance(STEP_DEGREES), None);
        assert_eq!(r.remaining_steps(STEP_DEGREES), 0);
    }

    #[test]
    fn test_ramp_up_lands_on_target() {
        assert_eq!(collect(ramp(70, 87)), vec![75, 80, 85, 87]);
    }

    #[test]
    fn test_ramp_down_lands_on_target() {
        assert_eq!(collect(ramp(100, 88)), vec![95, 90, 88]);
    }

    #[test]
    fn test_full_segment_swing() {
        let steps = collect(ramp(165, 70));
        assert_eq!(steps.len(), 19);
        assert_eq!(steps.first(), Some(&160));
        assert_eq!(steps.last(), Some(&70));
        assert_eq!(ramp(165, 70).remaining_steps(STEP_DEGREES), 19);
    }

    #[test]
    fn test_inverted_swing() {
        let r = ramp(5, 100);
        assert_eq!(r.remaining_steps(STEP_DEGREES), 19);
        assert_eq!(collect(r).last(), Some(&100));
    }
}
