//! Approach deceleration path.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vnav_core::geometry::LateralGeometry;
use vnav_core::kinematics::{altitude_change_on_path, seconds_for_distance};
use vnav_core::profile::{CheckpointReason, VerticalCheckpoint};
use vnav_core::simvar::{SimVarSource, keys};
use vnav_core::units::{ft_to_nm, kt_to_nm_per_s};

/// Predicted deceleration from the decel point down to the runway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproachProfile {
    /// Ordered by along-track distance: decel start first, landing last.
    pub checkpoints: Vec<VerticalCheckpoint>,
    /// Where deceleration to approach speed begins; the descent ends here.
    pub decel_point: VerticalCheckpoint,
    pub final_altitude_ft: f64,
}

#[derive(Debug, Error)]
pub enum DecelPathError {
    #[error("geometry too short for the approach: {required_nm:.1} NM required, {available_nm:.1} NM available")]
    GeometryTooShort { required_nm: f64, available_nm: f64 },
    #[error("invalid approach performance: {0}")]
    InvalidPerformance(&'static str),
}

/// Contract of a deceleration path builder.
pub trait DecelPathBuilder {
    fn compute_decel_path(&self, geometry: &LateralGeometry)
    -> Result<ApproachProfile, DecelPathError>;
}

impl<F> DecelPathBuilder for F
where
    F: Fn(&LateralGeometry) -> Result<ApproachProfile, DecelPathError>,
{
    fn compute_decel_path(
        &self,
        geometry: &LateralGeometry,
    ) -> Result<ApproachProfile, DecelPathError> {
        self(geometry)
    }
}

/// Approach figures for the reference builder.
#[derive(Debug, Clone, Copy)]
pub struct ApproachPerformance {
    pub glide_path_angle_deg: f64,
    pub stabilization_height_ft: f64,
    pub decel_start_speed_kt: f64,
    pub approach_speed_kt: f64,
    pub deceleration_kt_per_s: f64,
}

/// Decelerates at a constant rate on the glide path so that approach speed is
/// reached at the stabilization height.
pub struct ConstantDecelBuilder {
    performance: ApproachPerformance,
    simvars: Arc<dyn SimVarSource>,
}

impl ConstantDecelBuilder {
    pub fn new(performance: ApproachPerformance, simvars: Arc<dyn SimVarSource>) -> Self {
        Self {
            performance,
            simvars,
        }
    }

    fn validate(&self) -> Result<(), DecelPathError> {
        let p = &self.performance;
        if !(p.glide_path_angle_deg > 0.0 && p.glide_path_angle_deg < 90.0) {
            return Err(DecelPathError::InvalidPerformance(
                "glide path angle must be within (0, 90) degrees",
            ));
        }
        if !(p.approach_speed_kt.is_finite()
            && p.approach_speed_kt > 0.0
            && p.deceleration_kt_per_s.is_finite()
            && p.deceleration_kt_per_s > 0.0)
        {
            return Err(DecelPathError::InvalidPerformance(
                "approach speed and deceleration must be positive",
            ));
        }
        if !(p.decel_start_speed_kt.is_finite() && p.decel_start_speed_kt >= p.approach_speed_kt) {
            return Err(DecelPathError::InvalidPerformance(
                "decel start speed is below approach speed",
            ));
        }
        if !(p.stabilization_height_ft.is_finite() && p.stabilization_height_ft >= 0.0) {
            return Err(DecelPathError::InvalidPerformance(
                "stabilization height must be finite and not negative",
            ));
        }
        Ok(())
    }
}

impl DecelPathBuilder for ConstantDecelBuilder {
    fn compute_decel_path(
        &self,
        geometry: &LateralGeometry,
    ) -> Result<ApproachProfile, DecelPathError> {
        self.validate()?;
        let p = self.performance;
        let elevation_ft = self
            .simvars
            .scalar(keys::DESTINATION_ELEVATION)
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);

        let stabilization_height_ft = p.stabilization_height_ft;
        let stabilized_nm =
            ft_to_nm(stabilization_height_ft / p.glide_path_angle_deg.to_radians().tan());
        let decel_seconds = (p.decel_start_speed_kt - p.approach_speed_kt) / p.deceleration_kt_per_s;
        let decel_nm =
            kt_to_nm_per_s(0.5 * (p.decel_start_speed_kt + p.approach_speed_kt)) * decel_seconds;

        let available_nm = geometry.total_length_nm();
        let required_nm = stabilized_nm + decel_nm;
        if required_nm > available_nm {
            return Err(DecelPathError::GeometryTooShort {
                required_nm,
                available_nm,
            });
        }

        let decel_point = VerticalCheckpoint::new(
            CheckpointReason::DecelStart,
            available_nm - required_nm,
            elevation_ft + altitude_change_on_path(required_nm, p.glide_path_angle_deg),
            p.decel_start_speed_kt,
            0.0,
        );
        let stabilized = VerticalCheckpoint::new(
            CheckpointReason::ApproachSpeedReached,
            available_nm - stabilized_nm,
            elevation_ft + stabilization_height_ft,
            p.approach_speed_kt,
            decel_seconds,
        );
        let landing = VerticalCheckpoint::new(
            CheckpointReason::Landing,
            available_nm,
            elevation_ft,
            p.approach_speed_kt,
            decel_seconds + seconds_for_distance(stabilized_nm, p.approach_speed_kt),
        );

        Ok(ApproachProfile {
            checkpoints: vec![decel_point, stabilized, landing],
            decel_point,
            final_altitude_ft: elevation_ft,
        })
    }
}
