//! Cruise altitude change detection.

use vnav_core::constants::CRUISE_ALTITUDE_UNSET_FT;

/// Edge detector over successive cruise altitude readings.
///
/// Starts from the "unset" baseline, so the first real reading fires.
/// Missing or non-finite readings are ignored and leave the baseline alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CruiseAltitudeTrigger {
    last_ft: f64,
}

impl Default for CruiseAltitudeTrigger {
    fn default() -> Self {
        Self {
            last_ft: CRUISE_ALTITUDE_UNSET_FT,
        }
    }
}

impl CruiseAltitudeTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one reading; returns the new altitude when it differs from the previous one.
    pub fn observe(&mut self, reading: Option<f64>) -> Option<f64> {
        let value = reading.filter(|v| v.is_finite())?;
        if value == self.last_ft {
            return None;
        }
        self.last_ft = value;
        Some(value)
    }

    /// Last accepted reading, or the unset baseline.
    pub fn last_ft(&self) -> f64 {
        self.last_ft
    }
}
