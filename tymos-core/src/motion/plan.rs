//! Motion plans
//!
//! A plan is a bounded queue of stages executed strictly in order.

use heapless::Deque;

use super::MotionError;
use crate::servo::Ramp;
use crate::traits::ChannelAddress;

/// Maximum stages in one transition plan
///
/// A direct transition needs at most 14 (seven ramps, each followed by a
/// stagger pause); a collision sequence at most 11.
pub const PLAN_CAPACITY: usize = 16;

/// One step of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    /// Command an angle immediately
    Set { channel: ChannelAddress, angle: i16 },
    /// Step up to two channels together until both arrive
    ///
    /// Each round advances every unfinished ramp by one step, then waits
    /// `step_delay_ms` unless all ramps have arrived.
    Ramp {
        ramps: [Option<Ramp>; 2],
        step_delay_ms: u32,
    },
    /// Wait before the next stage
    Pause { ms: u32 },
}

impl Stage {
    /// Whether every ramp of this stage has arrived
    ///
    /// Always `true` for non-ramp stages.
    pub fn is_settled(&self) -> bool {
        match self {
            Stage::Ramp { ramps, .. } => ramps.iter().flatten().all(Ramp::is_done),
            _ => true,
        }
    }
}

/// Ordered stages of one transition
#[derive(Debug, Default)]
pub struct Plan {
    stages: Deque<Stage, PLAN_CAPACITY>,
}

impl Plan {
    /// Create an empty plan
    pub const fn new() -> Self {
        Self {
            stages: Deque::new(),
        }
    }

    /// Append a stage
    pub fn push(&mut self, stage: Stage) -> Result<(), MotionError> {
        self.stages
            .push_back(stage)
            .map_err(|_| MotionError::PlanOverflow)
    }

    /// Append an immediate angle command
    pub fn push_set(&mut self, channel: ChannelAddress, angle: i16) -> Result<(), MotionError> {
        self.push(Stage::Set { channel, angle })
    }

    /// Append a single-channel ramp; equal angles add nothing
    pub fn push_move(
        &mut self,
        channel: ChannelAddress,
        from: i16,
        to: i16,
        step_delay_ms: u32,
    ) -> Result<(), MotionError> {
        if from == to {
            return Ok(());
        }
        self.push(Stage::Ramp {
            ramps: [Some(Ramp::new(channel, from, to)), None],
            step_delay_ms,
        })
    }

    /// Append a two-channel ramp stepped in alternation
    pub fn push_pair(
        &mut self,
        first: Ramp,
        second: Ramp,
        step_delay_ms: u32,
    ) -> Result<(), MotionError> {
        if first.is_done() && second.is_done() {
            return Ok(());
        }
        self.push(Stage::Ramp {
            ramps: [Some(first), Some(second)],
            step_delay_ms,
        })
    }

    /// Append a pause; zero-length pauses add nothing
    pub fn push_pause(&mut self, ms: u32) -> Result<(), MotionError> {
        if ms == 0 {
            return Ok(());
        }
        self.push(Stage::Pause { ms })
    }

    /// Stage being executed
    pub fn front_mut(&mut self) -> Option<&mut Stage> {
        self.stages.front_mut()
    }

    /// Remove the stage being executed
    pub fn pop_front(&mut self) -> Option<Stage> {
        self.stages.pop_front()
    }

    /// Iterate stages in execution order
    pub fn iter(&self) -> impl Iterator<Item = &Stage> {
        self.stages.iter()
    }

    /// Number of stages left
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the plan is finished
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Drop all remaining stages
    pub fn clear(&mut self) {
        self.stages.clear();
    }
}
