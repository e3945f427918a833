//! Re-exported APIs for consumers of the guidance crate.

pub use crate::component::GuidanceComponent;
pub use crate::consumer::{ProfileConsumer, PseudoWaypoint, PseudoWaypointKind, PseudoWaypointRecorder};
pub use crate::driver::{DriverError, DriverState, PassOutcome, PathBuilders, VerticalProfileDriver};
pub use crate::store::{ProfileReader, ProfileSnapshot, ProfileStore};
pub use crate::trigger::CruiseAltitudeTrigger;
pub use vnav_climb::{ClimbPathBuilder, ClimbProfile};
pub use vnav_descent::{ApproachProfile, DecelPathBuilder, DescentPathBuilder, DescentProfile};

pub mod aircraft {
    use std::sync::Arc;

    use vnav_climb::{ClimbPerformance, ConstantRateClimbBuilder};
    use vnav_config::AircraftConfig;
    use vnav_core::simvar::SimVarSource;
    use vnav_descent::{
        ApproachPerformance, ConstantDecelBuilder, DescentPerformance, GeometricDescentBuilder,
    };

    use crate::driver::PathBuilders;

    /// Climb figures of an aircraft record.
    pub fn climb_performance(config: &AircraftConfig) -> ClimbPerformance {
        ClimbPerformance {
            rate_fpm: config.climb.rate_fpm,
            speed_kt: config.climb.speed_kt,
        }
    }

    /// Approach figures of an aircraft record.
    pub fn approach_performance(config: &AircraftConfig) -> ApproachPerformance {
        ApproachPerformance {
            glide_path_angle_deg: config.approach.glide_path_angle_deg,
            stabilization_height_ft: config.approach.stabilization_height_ft,
            decel_start_speed_kt: config.approach.decel_start_speed_kt,
            approach_speed_kt: config.approach.approach_speed_kt,
            deceleration_kt_per_s: config.approach.deceleration_kt_per_s,
        }
    }

    /// Descent figures of an aircraft record.
    pub fn descent_performance(config: &AircraftConfig) -> DescentPerformance {
        DescentPerformance {
            flight_path_angle_deg: config.descent.flight_path_angle_deg,
            speed_kt: config.descent.speed_kt,
        }
    }

    /// Wire the reference builders for an aircraft, all reading the same simulation variables.
    pub fn reference_builders(
        config: &AircraftConfig,
        simvars: Arc<dyn SimVarSource>,
    ) -> PathBuilders {
        PathBuilders::new(
            ConstantRateClimbBuilder::new(climb_performance(config), Arc::clone(&simvars)),
            ConstantDecelBuilder::new(approach_performance(config), Arc::clone(&simvars)),
            GeometricDescentBuilder::new(descent_performance(config), simvars),
        )
    }
}
