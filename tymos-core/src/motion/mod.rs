//! Motion planning and execution
//!
//! A digit transition is compiled into a short [`Plan`] of [`Stage`]s which
//! the [`MotionEngine`] executes without blocking: each call to
//! [`MotionEngine::poll`] runs every stage that is due and reports when it
//! next needs to be called.
//!
//! - [`collision`]: ordering rules for transitions that move segment 7
//! - [`reset`]: the commissioning sweep and walkthrough
//! - [`engine`]: request queue and stage executor

pub mod collision;
pub mod engine;
pub mod plan;
pub mod reset;

pub use collision::CollisionResolver;
pub use engine::{MotionEngine, MotionStatus, Request, REQUEST_QUEUE_CAPACITY};
pub use plan::{Plan, Stage, PLAN_CAPACITY};
pub use reset::{ResetSequence, ResetStep};

/// Errors that can occur when requesting motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionError {
    /// Request queue is full
    QueueFull,
    /// Transition needs more stages than a plan holds
    PlanOverflow,
    /// Time of day out of range
    InvalidTime,
}

/// Whether `deadline` has been reached at `now`, across timer wrap
pub(crate) const fn deadline_reached(now_ms: u32, deadline_ms: u32) -> bool {
    (now_ms.wrapping_sub(deadline_ms) as i32) >= 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_reached() {
        assert!(deadline_reached(100, 100));
        assert!(deadline_reached(101, 100));
        assert!(!deadline_reached(99, 100));
        assert!(deadline_reached(5, u32::MAX - 5));
        assert!(!deadline_reached(u32::MAX - 5, 5));
    }
}
