//! Motion engine
//!
//! Top-level orchestrator. Requests are queued and executed strictly one
//! after another; a transition is compiled into a [`Plan`] when it starts
//! executing, reading the speed profile at that moment.
//!
//! Nothing blocks. The host calls [`MotionEngine::poll`] from its control
//! loop and sleeps until the returned resume time. Writes land at the same
//! relative instants as a blocking implementation: a ramp commands its
//! first step immediately and waits one step delay between steps but not
//! after the last.

use heapless::Deque;

use super::collision::CollisionResolver;
use super::plan::{Plan, Stage};
use super::reset::{ResetSequence, ResetStep};
use super::{deadline_reached, MotionError};
use crate::config::ServoConfig;
use crate::segment::{
    active_segments, angles_for, channel_for, separator_angles, separator_channel,
    DigitPosition, DigitValue,
};
use crate::servo::ServoActuator;
use crate::traits::{PwmOutput, SpeedSource};

/// Maximum number of queued requests
pub const REQUEST_QUEUE_CAPACITY: usize = 8;

/// A queued motion request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Request {
    /// Change a digit from one value to another
    UpdateDigit {
        digit: DigitPosition,
        from: DigitValue,
        to: DigitValue,
    },
    /// Run the commissioning choreography
    Reset,
}

/// Result of a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionStatus {
    /// Nothing in flight or queued
    Idle,
    /// Motion in progress; poll again at `resume_at_ms`
    Busy { resume_at_ms: u32 },
}

impl MotionStatus {
    /// Whether motion is in progress
    pub const fn is_busy(&self) -> bool {
        matches!(self, MotionStatus::Busy { .. })
    }
}

/// Non-blocking servo motion engine
pub struct MotionEngine<P: PwmOutput, S: SpeedSource> {
    servo: ServoActuator<P>,
    speed: S,
    stagger_ms: u32,
    requests: Deque<Request, REQUEST_QUEUE_CAPACITY>,
    plan: Plan,
    reset: Option<ResetSequence>,
    resume_at: Option<u32>,
}

impl<P: PwmOutput, S: SpeedSource> MotionEngine<P, S> {
    /// Create an engine
    pub fn new(pwm: P, speed: S, config: &ServoConfig) -> Self {
        Self {
            servo: ServoActuator::new(pwm, config),
            speed,
            stagger_ms: config.stagger_ms,
            requests: Deque::new(),
            plan: Plan::new(),
            reset: None,
            resume_at: None,
        }
    }

    /// Queue a digit transition
    ///
    /// Equal values are a no-op and queue nothing.
    pub fn update_digit(
        &mut self,
        digit: DigitPosition,
        from: DigitValue,
        to: DigitValue,
    ) -> Result<(), MotionError> {
        if from == to {
            return Ok(());
        }
        self.enqueue(Request::UpdateDigit { digit, from, to })
    }

    /// Queue the commissioning choreography
    pub fn reset_sequence(&mut self) -> Result<(), MotionError> {
        self.enqueue(Request::Reset)
    }

    fn enqueue(&mut self, request: Request) -> Result<(), MotionError> {
        self.requests
            .push_back(request)
            .map_err(|_| MotionError::QueueFull)
    }

    /// Drive the separator to shown or rest immediately
    pub fn set_separator(&mut self, active: bool, now_ms: u32) {
        let angle = separator_angles().angle(active);
        self.servo.set_angle(separator_channel(), angle, now_ms);
    }

    /// Release idle channels
    ///
    /// Skipped while any motion is in flight or queued.
    pub fn tick(&mut self, now_ms: u32) {
        if !self.is_busy() {
            self.servo.check_idle(now_ms);
        }
    }

    /// Execute every stage that is due at `now_ms`
    pub fn poll(&mut self, now_ms: u32) -> MotionStatus {
        loop {
            if let Some(at) = self.resume_at {
                if !deadline_reached(now_ms, at) {
                    return MotionStatus::Busy { resume_at_ms: at };
                }
                self.resume_at = None;
            }

            if let Some(stage) = self.plan.front_mut() {
                match stage {
                    Stage::Set { channel, angle } => {
                        self.servo.set_angle(*channel, *angle, now_ms);
                        self.plan.pop_front();
                    }
                    Stage::Pause { ms } => {
                        self.resume_at = Some(now_ms.wrapping_add(*ms));
                        self.plan.pop_front();
                    }
                    Stage::Ramp {
                        ramps,
                        step_delay_ms,
                    } => {
                        for ramp in ramps.iter_mut().flatten() {
                            self.servo.step_ramp(ramp, now_ms);
                        }
                        let delay = *step_delay_ms;
                        if stage.is_settled() {
                            self.plan.pop_front();
                        } else {
                            self.resume_at = Some(now_ms.wrapping_add(delay));
                        }
                    }
                }
                continue;
            }

            if let Some(reset) = self.reset.as_mut() {
                match reset.next() {
                    Some(step) => self.plan_reset_step(step),
                    None => {
                        #[cfg(feature = "defmt")]
                        defmt::info!("Reset sequence complete");
                        self.reset = None;
                    }
                }
                continue;
            }

            match self.requests.pop_front() {
                Some(Request::UpdateDigit { digit, from, to }) => {
                    self.plan_transition(digit, from, to);
                }
                Some(Request::Reset) => {
                    #[cfg(feature = "defmt")]
                    defmt::info!("Starting reset sequence");
                    self.reset = Some(ResetSequence::new());
                }
                None => return MotionStatus::Idle,
            }
        }
    }

    fn plan_reset_step(&mut self, step: ResetStep) {
        let result = match step {
            ResetStep::Set { channel, angle } => self.plan.push_set(channel, angle),
            ResetStep::Pause { ms } => self.plan.push_pause(ms),
            ResetStep::Transition { digit, from, to } => {
                if from != to {
                    self.plan_transition(digit, from, to);
                }
                Ok(())
            }
        };
        if result.is_err() {
            self.abandon_plan();
        }
    }

    /// Compile a transition into the (empty) plan
    fn plan_transition(&mut self, digit: DigitPosition, from: DigitValue, to: DigitValue) {
        let step_delay_ms = self.speed.speed().step_delay_ms();
        let collision = CollisionResolver::needs_collision_logic(from, to);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "{}: {} -> {}{}",
            digit.label(),
            from.value(),
            to.value(),
            if collision { " (collision)" } else { "" }
        );

        let result = if collision {
            CollisionResolver::plan_sequence(
                digit,
                from,
                to,
                step_delay_ms,
                self.stagger_ms,
                &mut self.plan,
            )
        } else {
            plan_direct(digit, from, to, step_delay_ms, self.stagger_ms, &mut self.plan)
        };

        if result.is_err() {
            self.abandon_plan();
        }
    }

    fn abandon_plan(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::error!("Motion plan overflow, transition dropped");
        self.plan.clear();
    }

    /// Whether any motion is in flight or queued
    pub fn is_busy(&self) -> bool {
        self.resume_at.is_some()
            || !self.plan.is_empty()
            || self.reset.is_some()
            || !self.requests.is_empty()
    }

    /// Number of requests waiting behind the one in flight
    pub fn pending_requests(&self) -> usize {
        self.requests.len()
    }

    /// Request that will start next
    pub fn next_request(&self) -> Option<&Request> {
        self.requests.front()
    }

    /// Get a reference to the servo actuator
    pub fn actuator(&self) -> &ServoActuator<P> {
        &self.servo
    }

    /// Get a mutable reference to the servo actuator
    pub fn actuator_mut(&mut self) -> &mut ServoActuator<P> {
        &mut self.servo
    }

    /// Get a reference to the speed source
    pub fn speed_source(&self) -> &S {
        &self.speed
    }

    /// Get a mutable reference to the speed source
    pub fn speed_source_mut(&mut self) -> &mut S {
        &mut self.speed
    }
}

/// Plan a transition that leaves segment 7 alone
///
/// Every segment whose membership changes ramps to its new angle, in
/// segment order, followed by a stagger pause.
pub fn plan_direct(
    digit: DigitPosition,
    from: DigitValue,
    to: DigitValue,
    step_delay_ms: u32,
    stagger_ms: u32,
    plan: &mut Plan,
) -> Result<(), MotionError> {
    let before = active_segments(from);
    let after = active_segments(to);

    for segment in before.changed(after).iter() {
        let cfg = angles_for(segment);
        plan.push_move(
            channel_for(digit, segment),
            cfg.angle(before.contains(segment)),
            cfg.angle(after.contains(segment)),
            step_delay_ms,
        )?;
        plan.push_pause(stagger_ms)?;
    }
    Ok(())
}
