//! Climb path prediction.
//!
//! [`ClimbPathBuilder`] is the contract the vertical profile driver relies on:
//! a state refresh followed by a compute call. [`ConstantRateClimbBuilder`] is a
//! kinematic reference implementation that climbs at a fixed rate and speed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use vnav_core::geometry::LateralGeometry;
use vnav_core::kinematics::{distance_for_altitude_change, seconds_for_distance};
use vnav_core::profile::{CheckpointReason, VerticalCheckpoint};
use vnav_core::simvar::{SimVarSource, keys};

/// Predicted climb from the origin up to the cruise altitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimbProfile {
    pub checkpoints: Vec<VerticalCheckpoint>,
    /// Absent when the geometry ends before the cruise altitude is reached.
    pub top_of_climb: Option<VerticalCheckpoint>,
}

#[derive(Debug, Error)]
pub enum ClimbPathError {
    #[error("climb builder state was not refreshed before computing")]
    StaleState,
    #[error("cruise altitude is not available")]
    MissingCruiseAltitude,
    #[error("climb performance must be positive (rate {rate_fpm} ft/min, speed {speed_kt} kt)")]
    InvalidPerformance { rate_fpm: f64, speed_kt: f64 },
}

/// Contract of a climb path builder.
///
/// `update` refreshes whatever flight-plan or performance state the builder
/// depends on; it is called before every compute.
pub trait ClimbPathBuilder {
    fn update(&mut self);

    fn compute_climb_path(
        &mut self,
        geometry: &LateralGeometry,
    ) -> Result<ClimbProfile, ClimbPathError>;
}

/// Constant climb rate and speed.
#[derive(Debug, Clone, Copy)]
pub struct ClimbPerformance {
    pub rate_fpm: f64,
    pub speed_kt: f64,
}

#[derive(Debug, Clone, Copy)]
struct ClimbConditions {
    origin_elevation_ft: f64,
    cruise_altitude_ft: Option<f64>,
}

/// Reference climb builder fed from simulation variables.
pub struct ConstantRateClimbBuilder {
    performance: ClimbPerformance,
    simvars: Arc<dyn SimVarSource>,
    conditions: Option<ClimbConditions>,
}

impl ConstantRateClimbBuilder {
    pub fn new(performance: ClimbPerformance, simvars: Arc<dyn SimVarSource>) -> Self {
        Self {
            performance,
            simvars,
            conditions: None,
        }
    }
}

impl ClimbPathBuilder for ConstantRateClimbBuilder {
    fn update(&mut self) {
        let conditions = ClimbConditions {
            origin_elevation_ft: self
                .simvars
                .scalar(keys::ORIGIN_ELEVATION)
                .filter(|v| v.is_finite())
                .unwrap_or(0.0),
            cruise_altitude_ft: self
                .simvars
                .scalar(keys::CRUISE_ALTITUDE)
                .filter(|v| v.is_finite() && *v > 0.0),
        };
        debug!(?conditions, "climb builder refreshed");
        self.conditions = Some(conditions);
    }

    fn compute_climb_path(
        &mut self,
        geometry: &LateralGeometry,
    ) -> Result<ClimbProfile, ClimbPathError> {
        let conditions = self.conditions.take().ok_or(ClimbPathError::StaleState)?;
        let cruise_altitude_ft = conditions
            .cruise_altitude_ft
            .ok_or(ClimbPathError::MissingCruiseAltitude)?;
        let ClimbPerformance { rate_fpm, speed_kt } = self.performance;
        if !(rate_fpm > 0.0 && speed_kt > 0.0) {
            return Err(ClimbPathError::InvalidPerformance { rate_fpm, speed_kt });
        }

        Ok(integrate_climb(
            geometry,
            conditions.origin_elevation_ft,
            cruise_altitude_ft,
            self.performance,
        ))
    }
}

fn integrate_climb(
    geometry: &LateralGeometry,
    origin_elevation_ft: f64,
    cruise_altitude_ft: f64,
    performance: ClimbPerformance,
) -> ClimbProfile {
    let speed_kt = performance.speed_kt;
    let checkpoint = |reason, distance: f64, altitude: f64| {
        VerticalCheckpoint::new(
            reason,
            distance,
            altitude,
            speed_kt,
            seconds_for_distance(distance, speed_kt),
        )
    };

    let mut checkpoints = vec![checkpoint(CheckpointReason::Origin, 0.0, origin_elevation_ft)];
    let mut altitude = origin_elevation_ft;
    let mut leg_start = 0.0_f64;

    if altitude >= cruise_altitude_ft {
        let top = checkpoint(CheckpointReason::TopOfClimb, 0.0, altitude);
        checkpoints.push(top);
        return ClimbProfile {
            checkpoints,
            top_of_climb: Some(top),
        };
    }

    for (leg, leg_end) in geometry.legs_with_distance() {
        let target = leg
            .altitude_constraint
            .and_then(|constraint| constraint.ceiling_ft())
            .map(|ceiling| ceiling.min(cruise_altitude_ft))
            .unwrap_or(cruise_altitude_ft)
            .max(altitude);

        let needed = distance_for_altitude_change(target - altitude, performance.rate_fpm, speed_kt);
        let leg_length = leg_end - leg_start;

        if needed <= leg_length {
            let level_off = leg_start + needed;
            altitude = target;
            if target >= cruise_altitude_ft {
                let top = checkpoint(CheckpointReason::TopOfClimb, level_off, altitude);
                checkpoints.push(top);
                return ClimbProfile {
                    checkpoints,
                    top_of_climb: Some(top),
                };
            }
            if needed > 0.0 && needed < leg_length {
                checkpoints.push(checkpoint(
                    CheckpointReason::AltitudeConstraint,
                    level_off,
                    altitude,
                ));
            }
        } else {
            altitude += (target - altitude) * leg_length / needed;
        }

        checkpoints.push(checkpoint(CheckpointReason::LegEnd, leg_end, altitude));
        leg_start = leg_end;
    }

    ClimbProfile {
        checkpoints,
        top_of_climb: None,
    }
}
