//! Checkpoint type shared by every vertical profile.

use serde::{Deserialize, Serialize};

/// Why a checkpoint was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointReason {
    Origin,
    LegEnd,
    AltitudeConstraint,
    TopOfClimb,
    TopOfDescent,
    DecelStart,
    ApproachSpeedReached,
    Landing,
}

/// One sample of a predicted vertical path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerticalCheckpoint {
    pub reason: CheckpointReason,
    /// Along-track distance from the first fix of the geometry.
    pub distance_from_start_nm: f64,
    pub altitude_ft: f64,
    pub speed_kt: f64,
    /// Predicted time, relative to the start of the phase.
    pub seconds_from_start: f64,
}

impl VerticalCheckpoint {
    pub fn new(
        reason: CheckpointReason,
        distance_from_start_nm: f64,
        altitude_ft: f64,
        speed_kt: f64,
        seconds_from_start: f64,
    ) -> Self {
        Self {
            reason,
            distance_from_start_nm,
            altitude_ft,
            speed_kt,
            seconds_from_start,
        }
    }
}
