//! Core units, constants, and shared primitives for the vertical profile workspace.

pub mod geometry;
pub mod profile;
pub mod simvar;

/// Physical and operational constants (aviation units unless stated otherwise).
pub mod constants {
    /// Feet per nautical mile.
    pub const FEET_PER_NM: f64 = 6_076.115_49;
    /// Seconds per hour.
    pub const SECONDS_PER_HOUR: f64 = 3_600.0;
    /// Baseline cruise altitude before the first reading ("unset").
    pub const CRUISE_ALTITUDE_UNSET_FT: f64 = 0.0;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::{FEET_PER_NM, SECONDS_PER_HOUR};

    /// Convert nautical miles to feet.
    #[inline]
    pub fn nm_to_ft(v: f64) -> f64 {
        v * FEET_PER_NM
    }

    /// Convert feet to nautical miles.
    #[inline]
    pub fn ft_to_nm(v: f64) -> f64 {
        v / FEET_PER_NM
    }

    /// Convert knots to nautical miles per second.
    #[inline]
    pub fn kt_to_nm_per_s(v: f64) -> f64 {
        v / SECONDS_PER_HOUR
    }
}

/// Kinematic helpers shared by the path builders.
pub mod kinematics {
    use super::units::{kt_to_nm_per_s, nm_to_ft};

    /// Seconds needed to cover `distance_nm` at a constant ground speed.
    #[inline]
    pub fn seconds_for_distance(distance_nm: f64, speed_kt: f64) -> f64 {
        distance_nm / kt_to_nm_per_s(speed_kt)
    }

    /// Ground distance flown while changing altitude at `rate_fpm` and `speed_kt`.
    #[inline]
    pub fn distance_for_altitude_change(delta_ft: f64, rate_fpm: f64, speed_kt: f64) -> f64 {
        let seconds = delta_ft.abs() / rate_fpm * 60.0;
        kt_to_nm_per_s(speed_kt) * seconds
    }

    /// Altitude change along `distance_nm` on a path inclined by `angle_deg`.
    #[inline]
    pub fn altitude_change_on_path(distance_nm: f64, angle_deg: f64) -> f64 {
        nm_to_ft(distance_nm) * angle_deg.to_radians().tan()
    }
}

pub use geometry::{AltitudeConstraint, LateralGeometry, Leg, LegKind};
pub use profile::{CheckpointReason, VerticalCheckpoint};
pub use simvar::{SimVarSource, SimVarStore};
