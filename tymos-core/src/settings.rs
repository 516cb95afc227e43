//! User settings
//!
//! Owner of the motion speed profile. The motion engine reads it through
//! [`SpeedSource`] at the start of every transition.

use crate::config::SpeedProfile;
use crate::traits::SpeedSource;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Runtime settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settings {
    speed: SpeedProfile,
}

impl Settings {
    /// Create settings with the given speed profile
    pub const fn new(speed: SpeedProfile) -> Self {
        Self { speed }
    }

    /// Select the speed profile
    pub fn set_speed(&mut self, speed: SpeedProfile) {
        self.speed = speed;
        #[cfg(feature = "defmt")]
        defmt::info!("Speed set to {}", speed.name());
    }

    /// Current speed profile
    pub const fn speed(&self) -> SpeedProfile {
        self.speed
    }

    /// Whether the quiet night profile is selected
    pub fn is_night_mode(&self) -> bool {
        self.speed == SpeedProfile::Night
    }

    /// Switch between the night and normal profiles
    pub fn set_night_mode(&mut self, enabled: bool) {
        self.set_speed(if enabled {
            SpeedProfile::Night
        } else {
            SpeedProfile::Normal
        });
    }
}

impl SpeedSource for Settings {
    fn speed(&self) -> SpeedProfile {
        self.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_normal() {
        let settings = Settings::default();
        assert_eq!(settings.speed(), SpeedProfile::Normal);
        assert!(!settings.is_night_mode());
    }

    #[test]
    fn test_night_mode() {
        let mut settings = Settings::new(SpeedProfile::Fast);

        settings.set_night_mode(true);
        assert!(settings.is_night_mode());
        assert_eq!(SpeedSource::speed(&settings), SpeedProfile::Night);

        // Leaving night mode goes back to normal, not the previous profile
        settings.set_night_mode(false);
        assert_eq!(settings.speed(), SpeedProfile::Normal);
    }

    #[test]
    fn test_profile_delays() {
        assert_eq!(SpeedProfile::Fast.step_delay_ms(), 10);
        assert_eq!(SpeedProfile::Normal.step_delay_ms(), 50);
        assert_eq!(SpeedProfile::Night.step_delay_ms(), 100);
    }

    #[test]
    fn test_profile_names() {
        assert_eq!(SpeedProfile::from_name("NIGHT"), Some(SpeedProfile::Night));
        assert_eq!(SpeedProfile::from_name("fast"), Some(SpeedProfile::Fast));
        assert_eq!(SpeedProfile::from_name("slow"), None);
        for p in [SpeedProfile::Fast, SpeedProfile::Normal, SpeedProfile::Night] {
            assert_eq!(SpeedProfile::from_name(p.name()), Some(p));
        }
    }
}
