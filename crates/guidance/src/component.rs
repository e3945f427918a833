//! Host-loop contract shared by guidance components.

use std::time::Duration;

/// A component driven by the guidance host loop.
pub trait GuidanceComponent {
    type Error;

    /// Called once before the first update.
    fn init(&mut self);

    /// Called on every host tick with the time elapsed since the previous one.
    fn update(&mut self, delta: Duration) -> Result<(), Self::Error>;
}
