//! Commissioning reset choreography
//!
//! Run once after power-up to check wiring and motion visually:
//!
//! 1. Every segment to rest, one at a time: H1, H2, separator, M1, M2,
//!    segments 1 to 7.
//! 2. Every segment to shown in reverse: M2, M1, separator, H2, H1,
//!    segments 7 to 1. The display reads 88:88.
//! 3. Walkthrough of the values 0-9, cycling across the four positions,
//!    through the normal transition path.
//! 4. Every position back to 8.
//!
//! [`ResetSequence`] yields the choreography lazily, one step at a time.

use crate::config::{
    DIGIT_COUNT, RESET_PHASE_PAUSE_MS, RESET_SEGMENT_PAUSE_MS, SEGMENTS_PER_DIGIT,
    WALKTHROUGH_PAUSE_MS, WALKTHROUGH_SETTLE_MS,
};
use crate::segment::{
    angles_for, channel_for, separator_angles, separator_channel, DigitPosition, DigitValue,
    Segment,
};
use crate::traits::ChannelAddress;

/// One step of the reset choreography
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetStep {
    /// Command an angle immediately
    Set { channel: ChannelAddress, angle: i16 },
    /// Run a normal digit transition
    Transition {
        digit: DigitPosition,
        from: DigitValue,
        to: DigitValue,
    },
    /// Wait
    Pause { ms: u32 },
}

/// A unit of the sweep order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SweepUnit {
    Digit(DigitPosition),
    Separator,
}

impl SweepUnit {
    const fn len(self) -> u8 {
        match self {
            SweepUnit::Digit(_) => SEGMENTS_PER_DIGIT as u8,
            SweepUnit::Separator => 1,
        }
    }
}

const REST_ORDER: [SweepUnit; 5] = [
    SweepUnit::Digit(DigitPosition::TensHours),
    SweepUnit::Digit(DigitPosition::UnitsHours),
    SweepUnit::Separator,
    SweepUnit::Digit(DigitPosition::TensMinutes),
    SweepUnit::Digit(DigitPosition::UnitsMinutes),
];

/// Number of walkthrough values (0-9)
const WALKTHROUGH_LEN: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Phase {
    RestSweep,
    RestHold,
    ShowSweep,
    ShowHold,
    Walkthrough,
    WalkthroughHold,
    Settle,
    Done,
}

/// Lazy cursor over the reset choreography
#[derive(Debug, Clone)]
pub struct ResetSequence {
    phase: Phase,
    unit: u8,
    item: u8,
    pause_pending: bool,
    shown: [DigitValue; DIGIT_COUNT],
}

impl ResetSequence {
    /// Start the choreography from the beginning
    pub const fn new() -> Self {
        Self {
            phase: Phase::RestSweep,
            unit: 0,
            item: 0,
            pause_pending: false,
            shown: [DigitValue::EIGHT; DIGIT_COUNT],
        }
    }

    /// Whether every step has been yielded
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Digit values the walkthrough leaves on each position so far
    pub fn shown(&self) -> [DigitValue; DIGIT_COUNT] {
        self.shown
    }

    fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        self.unit = 0;
        self.item = 0;
    }

    /// Next sweep target, or `None` when the sweep is complete
    fn next_sweep(&mut self, show: bool) -> Option<ResetStep> {
        let order = REST_ORDER.len() as u8;
        while self.unit < order {
            let index = if show { order - 1 - self.unit } else { self.unit };
            let unit = REST_ORDER[index as usize];

            if self.item >= unit.len() {
                self.unit += 1;
                self.item = 0;
                continue;
            }

            let item = if show { unit.len() - 1 - self.item } else { self.item };
            self.item += 1;

            let (channel, cfg) = match unit {
                SweepUnit::Digit(digit) => {
                    let segment = Segment::ALL[item as usize];
                    (channel_for(digit, segment), angles_for(segment))
                }
                SweepUnit::Separator => (separator_channel(), separator_angles()),
            };
            return Some(ResetStep::Set {
                channel,
                angle: cfg.angle(show),
            });
        }
        None
    }

    fn next_walkthrough(&mut self) -> Option<ResetStep> {
        if self.item >= WALKTHROUGH_LEN {
            return None;
        }
        let value = DigitValue::new(self.item)?;
        let position = DigitPosition::ALL[self.item as usize % DIGIT_COUNT];
        self.item += 1;

        let from = self.shown[position.index()];
        self.shown[position.index()] = value;
        Some(ResetStep::Transition {
            digit: position,
            from,
            to: value,
        })
    }

    fn next_settle(&mut self) -> Option<ResetStep> {
        while (self.unit as usize) < DIGIT_COUNT {
            let position = DigitPosition::ALL[self.unit as usize];
            self.unit += 1;

            let from = self.shown[position.index()];
            if from != DigitValue::EIGHT {
                self.shown[position.index()] = DigitValue::EIGHT;
                return Some(ResetStep::Transition {
                    digit: position,
                    from,
                    to: DigitValue::EIGHT,
                });
            }
        }
        None
    }
}

impl Default for ResetSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for ResetSequence {
    type Item = ResetStep;

    fn next(&mut self) -> Option<ResetStep> {
        loop {
            if self.pause_pending {
                self.pause_pending = false;
                let ms = match self.phase {
                    Phase::RestSweep | Phase::ShowSweep => RESET_SEGMENT_PAUSE_MS,
                    _ => WALKTHROUGH_PAUSE_MS,
                };
                return Some(ResetStep::Pause { ms });
            }

            let step = match self.phase {
                Phase::RestSweep => self.next_sweep(false),
                Phase::ShowSweep => self.next_sweep(true),
                Phase::Walkthrough => self.next_walkthrough(),
                Phase::Settle => self.next_settle(),
                Phase::RestHold => {
                    self.enter(Phase::ShowSweep);
                    return Some(ResetStep::Pause {
                        ms: RESET_PHASE_PAUSE_MS,
                    });
                }
                Phase::ShowHold => {
                    self.enter(Phase::Walkthrough);
                    return Some(ResetStep::Pause {
                        ms: RESET_PHASE_PAUSE_MS,
                    });
                }
                Phase::WalkthroughHold => {
                    self.enter(Phase::Settle);
                    return Some(ResetStep::Pause {
                        ms: WALKTHROUGH_SETTLE_MS,
                    });
                }
                Phase::Done => return None,
            };

            match step {
                Some(step) => {
                    self.pause_pending = true;
                    return Some(step);
                }
                None => {
                    let next = match self.phase {
                        Phase::RestSweep => Phase::RestHold,
                        Phase::ShowSweep => Phase::ShowHold,
                        Phase::Walkthrough => Phase::WalkthroughHold,
                        _ => Phase::Done,
                    };
                    #[cfg(feature = "defmt")]
                    defmt::debug!("Reset: {} complete", self.phase);
                    self.enter(next);
                }
            }
        }
    }
}
