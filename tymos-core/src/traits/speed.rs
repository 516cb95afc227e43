//! Speed source trait

use crate::config::SpeedProfile;

/// Provides the motion speed profile
///
/// Read once at the start of every transition; the motion core never
/// writes it.
pub trait SpeedSource {
    /// Current speed profile
    fn speed(&self) -> SpeedProfile;
}

/// A fixed profile
impl SpeedSource for SpeedProfile {
    fn speed(&self) -> SpeedProfile {
        *self
    }
}

impl<T: SpeedSource + ?Sized> SpeedSource for &T {
    fn speed(&self) -> SpeedProfile {
        (**self).speed()
    }
}
