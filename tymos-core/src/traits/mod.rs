//! Hardware abstraction traits
//!
//! These traits define the interface between the motion logic and the
//! hardware or collaborator implementations it is driven through.

pub mod pwm;
pub mod speed;
pub mod time;

pub use pwm::{BoardAddress, ChannelAddress, PwmOutput};
pub use speed::SpeedSource;
pub use time::{ClockTime, TimeSource};
