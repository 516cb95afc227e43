//! Test doubles shared by the unit tests

use crate::traits::{BoardAddress, ChannelAddress, PwmOutput};

/// One recorded `set_pwm` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmWrite {
    pub board: BoardAddress,
    pub channel: u8,
    pub on: u16,
    pub off: u16,
}

impl PwmWrite {
    pub const fn new(board: BoardAddress, channel: u8, on: u16, off: u16) -> Self {
        Self {
            board,
            channel,
            on,
            off,
        }
    }

    pub const fn address(&self) -> ChannelAddress {
        ChannelAddress::new(self.board, self.channel)
    }
}

/// PWM output that records every write with the simulated time
#[derive(Debug, Default)]
pub struct RecordingPwm {
    /// Simulated time stamped onto the next writes
    pub now_ms: u32,
    pub writes: Vec<PwmWrite>,
    pub stamps: Vec<u32>,
}

impl RecordingPwm {
    /// Writes to one channel, with their timestamps
    pub fn writes_to(&self, addr: ChannelAddress) -> Vec<(u32, u16)> {
        self.writes
            .iter()
            .zip(&self.stamps)
            .filter(|(w, _)| w.address() == addr)
            .map(|(w, t)| (*t, w.off))
            .collect()
    }
}

impl PwmOutput for RecordingPwm {
    fn set_pwm(&mut self, board: BoardAddress, channel: u8, on: u16, off: u16) {
        self.writes.push(PwmWrite::new(board, channel, on, off));
        self.stamps.push(self.now_ms);
    }
}
