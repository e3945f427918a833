//! Descent path from top of descent down to the approach boundary.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use vnav_core::geometry::LateralGeometry;
use vnav_core::kinematics::{altitude_change_on_path, seconds_for_distance};
use vnav_core::profile::{CheckpointReason, VerticalCheckpoint};
use vnav_core::simvar::{SimVarSource, keys};
use vnav_core::units::ft_to_nm;

use crate::decel::ApproachProfile;

/// Predicted descent ending at the decel point of an approach profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescentProfile {
    pub checkpoints: Vec<VerticalCheckpoint>,
    pub top_of_descent: VerticalCheckpoint,
    /// Decel point of the approach profile this descent was built from.
    pub approach_boundary: VerticalCheckpoint,
}

#[derive(Debug, Error)]
pub enum DescentPathError {
    #[error("cruise altitude is not available")]
    MissingCruiseAltitude,
    #[error("top of descent lies {overshoot_nm:.1} NM before the start of the flight plan")]
    GeometryTooShort { overshoot_nm: f64 },
    #[error("invalid descent performance: {0}")]
    InvalidPerformance(&'static str),
}

/// Contract of a descent path builder.
pub trait DescentPathBuilder {
    fn compute_descent_path(
        &self,
        geometry: &LateralGeometry,
        approach: &ApproachProfile,
    ) -> Result<DescentProfile, DescentPathError>;
}

impl<F> DescentPathBuilder for F
where
    F: Fn(&LateralGeometry, &ApproachProfile) -> Result<DescentProfile, DescentPathError>,
{
    fn compute_descent_path(
        &self,
        geometry: &LateralGeometry,
        approach: &ApproachProfile,
    ) -> Result<DescentProfile, DescentPathError> {
        self(geometry, approach)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DescentPerformance {
    pub flight_path_angle_deg: f64,
    pub speed_kt: f64,
}

/// Idle-path stand-in: a fixed flight path angle at constant speed.
pub struct GeometricDescentBuilder {
    performance: DescentPerformance,
    simvars: Arc<dyn SimVarSource>,
}

impl GeometricDescentBuilder {
    pub fn new(performance: DescentPerformance, simvars: Arc<dyn SimVarSource>) -> Self {
        Self {
            performance,
            simvars,
        }
    }
}

impl DescentPathBuilder for GeometricDescentBuilder {
    fn compute_descent_path(
        &self,
        geometry: &LateralGeometry,
        approach: &ApproachProfile,
    ) -> Result<DescentProfile, DescentPathError> {
        let DescentPerformance {
            flight_path_angle_deg,
            speed_kt,
        } = self.performance;
        if !(flight_path_angle_deg > 0.0 && flight_path_angle_deg < 90.0) {
            return Err(DescentPathError::InvalidPerformance(
                "flight path angle must be within (0, 90) degrees",
            ));
        }
        if !(speed_kt > 0.0) {
            return Err(DescentPathError::InvalidPerformance(
                "descent speed must be positive",
            ));
        }

        let cruise_altitude_ft = self
            .simvars
            .scalar(keys::CRUISE_ALTITUDE)
            .filter(|v| v.is_finite() && *v > 0.0)
            .ok_or(DescentPathError::MissingCruiseAltitude)?;

        let boundary = approach.decel_point;
        let delta_ft = (cruise_altitude_ft - boundary.altitude_ft).max(0.0);
        let descent_nm = ft_to_nm(delta_ft / flight_path_angle_deg.to_radians().tan());
        let tod_distance = boundary.distance_from_start_nm - descent_nm;
        if tod_distance < 0.0 {
            return Err(DescentPathError::GeometryTooShort {
                overshoot_nm: -tod_distance,
            });
        }

        let top_altitude_ft = boundary.altitude_ft + delta_ft;
        let at = |reason, distance: f64| {
            VerticalCheckpoint::new(
                reason,
                distance,
                top_altitude_ft - altitude_change_on_path(distance - tod_distance, flight_path_angle_deg),
                speed_kt,
                seconds_for_distance(distance - tod_distance, speed_kt),
            )
        };

        let top_of_descent = at(CheckpointReason::TopOfDescent, tod_distance);
        let mut checkpoints = vec![top_of_descent];
        checkpoints.extend(
            geometry
                .legs_with_distance()
                .map(|(_, leg_end)| leg_end)
                .filter(|d| *d > tod_distance && *d < boundary.distance_from_start_nm)
                .map(|d| at(CheckpointReason::LegEnd, d)),
        );
        let mut end = at(CheckpointReason::DecelStart, boundary.distance_from_start_nm);
        end.altitude_ft = boundary.altitude_ft;
        checkpoints.push(end);

        debug!(
            tod_nm = tod_distance,
            descent_nm, cruise_altitude_ft, "descent path computed"
        );

        Ok(DescentProfile {
            checkpoints,
            top_of_descent,
            approach_boundary: boundary,
        })
    }
}
