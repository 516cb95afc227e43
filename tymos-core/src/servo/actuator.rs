//! Servo actuator
//!
//! Owns the per-channel drive state of both boards. Every servo write in
//! the system goes through [`ServoActuator::set_angle`] or
//! [`ServoActuator::detach`].
//!
//! A channel that has not been commanded for the idle timeout is
//! released (duty set to zero) so the servo stops holding and buzzing.

use super::codec::PulseCodec;
use super::ramp::Ramp;
use crate::config::{ServoConfig, BOARD_COUNT, CHANNELS_PER_BOARD, STEP_DEGREES};
use crate::traits::{BoardAddress, ChannelAddress, PwmOutput};

/// Drive state of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoState {
    /// Time of the last angle command (ms)
    pub last_move_ms: u32,
    /// Whether a holding signal is being sent
    pub driven: bool,
}

/// Per-channel servo writer with idle release
pub struct ServoActuator<P: PwmOutput> {
    pwm: P,
    codec: PulseCodec,
    idle_timeout_ms: u32,
    states: [[ServoState; CHANNELS_PER_BOARD]; BOARD_COUNT],
}

impl<P: PwmOutput> ServoActuator<P> {
    /// Create an actuator; all channels start released
    pub fn new(pwm: P, config: &ServoConfig) -> Self {
        Self {
            pwm,
            codec: PulseCodec::from_config(config),
            idle_timeout_ms: config.idle_timeout_ms,
            states: [[ServoState::default(); CHANNELS_PER_BOARD]; BOARD_COUNT],
        }
    }

    fn index(addr: ChannelAddress) -> Option<(usize, usize)> {
        let slot = addr.board.slot()?;
        let channel = usize::from(addr.channel);
        (channel < CHANNELS_PER_BOARD).then_some((slot, channel))
    }

    /// Command a channel to an angle immediately
    ///
    /// Writes `on = 0, off = pulse` and marks the channel driven. Addresses
    /// outside the fitted boards are ignored.
    pub fn set_angle(&mut self, addr: ChannelAddress, angle: i16, now_ms: u32) {
        let Some((slot, channel)) = Self::index(addr) else {
            return;
        };

        let pulse = self.codec.pulse(angle);
        self.pwm.set_pwm(addr.board, addr.channel, 0, pulse);
        self.states[slot][channel] = ServoState {
            last_move_ms: now_ms,
            driven: true,
        };
    }

    /// Advance a ramp by one step and command the new angle
    ///
    /// Returns `false` without writing if the ramp was already complete.
    pub fn step_ramp(&mut self, ramp: &mut Ramp, now_ms: u32) -> bool {
        match ramp.advance(STEP_DEGREES) {
            Some(angle) => {
                self.set_angle(ramp.channel(), angle, now_ms);
                true
            }
            None => false,
        }
    }

    /// Turn a channel's signal off
    pub fn detach(&mut self, addr: ChannelAddress) {
        let Some((slot, channel)) = Self::index(addr) else {
            return;
        };

        self.pwm.set_pwm(addr.board, addr.channel, 0, 0);
        self.states[slot][channel].driven = false;
    }

    /// Release every driven channel idle for at least the timeout
    ///
    /// Returns the number of channels released.
    pub fn check_idle(&mut self, now_ms: u32) -> usize {
        let mut released = 0;
        for slot in 0..BOARD_COUNT {
            let Some(board) = BoardAddress::from_slot(slot) else {
                continue;
            };
            for channel in 0..CHANNELS_PER_BOARD {
                let state = self.states[slot][channel];
                if state.driven && now_ms.wrapping_sub(state.last_move_ms) >= self.idle_timeout_ms
                {
                    self.detach(ChannelAddress::new(board, channel as u8));
                    released += 1;
                }
            }
        }

        #[cfg(feature = "defmt")]
        if released > 0 {
            defmt::trace!("Released {} idle servo channels", released);
        }

        released
    }

    /// Drive state of a channel (`None` for unknown addresses)
    pub fn state(&self, addr: ChannelAddress) -> Option<ServoState> {
        Self::index(addr).map(|(slot, channel)| self.states[slot][channel])
    }

    /// Whether a channel is currently driven
    pub fn is_driven(&self, addr: ChannelAddress) -> bool {
        self.state(addr).is_some_and(|s| s.driven)
    }

    /// Number of driven channels
    pub fn driven_count(&self) -> usize {
        self.states.iter().flatten().filter(|s| s.driven).count()
    }

    /// Angle codec in use
    pub fn codec(&self) -> &PulseCodec {
        &self.codec
    }

    /// Get a reference to the PWM output
    pub fn pwm(&self) -> &P {
        &self.pwm
    }

    /// Get a mutable reference to the PWM output
    pub fn pwm_mut(&mut self) -> &mut P {
        &mut self.pwm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{PwmWrite, RecordingPwm};

    fn actuator() -> ServoActuator<RecordingPwm> {
        ServoActuator::new(RecordingPwm::default(), &ServoConfig::default())
    }

    const CH: ChannelAddress = ChannelAddress::new(BoardAddress::MINUTES, 3);

    #[test]
    fn test_set_angle_writes_pulse() {
        let mut servo = actuator();

        servo.set_angle(CH, 70, 1000);

        assert_eq!(
            servo.pwm().writes,
            vec![PwmWrite::new(BoardAddress::MINUTES, 3, 0, 261)]
        );
        assert_eq!(
            servo.state(CH),
            Some(ServoState {
                last_move_ms: 1000,
                driven: true
            })
        );
    }

    #[test]
    fn test_unknown_addresses_ignored() {
        let mut servo = actuator();

        servo.set_angle(ChannelAddress::NONE, 70, 0);
        servo.set_angle(ChannelAddress::new(BoardAddress::HOURS, 16), 70, 0);
        servo.detach(ChannelAddress::new(BoardAddress(0x50), 1));

        assert!(servo.pwm().writes.is_empty());
        assert_eq!(servo.driven_count(), 0);
        assert_eq!(servo.state(ChannelAddress::NONE), None);
    }

    #[test]
    fn test_detach_writes_zero() {
        let mut servo = actuator();

        servo.set_angle(CH, 70, 0);
        servo.detach(CH);

        assert_eq!(
            servo.pwm().writes.last(),
            Some(&PwmWrite::new(BoardAddress::MINUTES, 3, 0, 0))
        );
        assert!(!servo.is_driven(CH));
    }

    #[test]
    fn test_idle_release_boundary() {
        let mut servo = actuator();
        servo.set_angle(CH, 70, 1000);

        assert_eq!(servo.check_idle(1499), 0);
        assert!(servo.is_driven(CH));

        assert_eq!(servo.check_idle(1500), 1);
        assert!(!servo.is_driven(CH));

        // Released channels are not released again
        let writes = servo.pwm().writes.len();
        assert_eq!(servo.check_idle(5000), 0);
        assert_eq!(servo.pwm().writes.len(), writes);
    }

    #[test]
    fn test_idle_release_across_timer_wrap() {
        let mut servo = actuator();
        servo.set_angle(CH, 70, u32::MAX - 100);

        assert_eq!(servo.check_idle(u32::MAX), 0);
        assert_eq!(servo.check_idle(398), 0);
        assert_eq!(servo.check_idle(399), 1);
    }

    #[test]
    fn test_new_command_restarts_idle_timer() {
        let mut servo = actuator();
        let other = ChannelAddress::new(BoardAddress::HOURS, 15);

        servo.set_angle(CH, 70, 0);
        servo.set_angle(other, 165, 300);

        assert_eq!(servo.check_idle(500), 1);
        assert!(!servo.is_driven(CH));
        assert!(servo.is_driven(other));
        assert_eq!(servo.check_idle(800), 1);
    }

    #[test]
    fn test_step_ramp() {
        let mut servo = actuator();
        let mut ramp = Ramp::new(CH, 100, 88);

        assert!(servo.step_ramp(&mut ramp, 0));
        assert!(servo.step_ramp(&mut ramp, 50));
        assert!(servo.step_ramp(&mut ramp, 100));
        assert!(!servo.step_ramp(&mut ramp, 150));

        let codec = *servo.codec();
        let offs: Vec<u16> = servo.pwm().writes.iter().map(|w| w.off).collect();
        assert_eq!(offs, vec![codec.pulse(95), codec.pulse(90), codec.pulse(88)]);
        assert_eq!(servo.state(CH).unwrap().last_move_ms, 100);
    }
}
