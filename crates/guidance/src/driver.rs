//! Vertical profile driver.
//!
//! Decides when the vertical profile must be recomputed and sequences the
//! path builders for one pass:
//!
//! 1. refresh the climb builder,
//! 2. stop if the geometry has no legs,
//! 3. climb (only when enabled by configuration),
//! 4. approach deceleration,
//! 5. descent, anchored on the approach from step 4,
//! 6. notify the consumer.
//!
//! A builder failure ends the pass and is returned to the caller. A climb
//! published in step 3 stays published even if step 4 or 5 fails afterwards.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};
use vnav_climb::{ClimbPathBuilder, ClimbPathError, ClimbProfile};
use vnav_config::VnavConfig;
use vnav_core::geometry::LateralGeometry;
use vnav_core::simvar::{SimVarSource, keys};
use vnav_descent::{
    ApproachProfile, DecelPathBuilder, DecelPathError, DescentPathBuilder, DescentPathError,
    DescentProfile,
};

use crate::component::GuidanceComponent;
use crate::consumer::ProfileConsumer;
use crate::store::{ProfileReader, ProfileSnapshot, ProfileStore};
use crate::trigger::CruiseAltitudeTrigger;

/// Builder failure surfaced from a recomputation pass.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("climb path computation failed: {0}")]
    Climb(#[from] ClimbPathError),
    #[error("deceleration path computation failed: {0}")]
    Decel(#[from] DecelPathError),
    #[error("descent path computation failed: {0}")]
    Descent(#[from] DescentPathError),
}

/// Logical state of the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Recomputing,
}

/// What a trigger call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// A full pass ran and the profiles were published under `generation`.
    Published { generation: u64 },
    /// The geometry had no legs; nothing was recomputed.
    SkippedEmptyGeometry,
    /// The cruise altitude did not change; no pass was started.
    Unchanged,
}

/// The three path builders the driver sequences.
pub struct PathBuilders {
    pub climb: Box<dyn ClimbPathBuilder>,
    pub decel: Box<dyn DecelPathBuilder>,
    pub descent: Box<dyn DescentPathBuilder>,
}

impl PathBuilders {
    pub fn new(
        climb: impl ClimbPathBuilder + 'static,
        decel: impl DecelPathBuilder + 'static,
        descent: impl DescentPathBuilder + 'static,
    ) -> Self {
        Self {
            climb: Box::new(climb),
            decel: Box::new(decel),
            descent: Box::new(descent),
        }
    }
}

/// Owns the published climb, approach and descent profiles for one guidance session.
pub struct VerticalProfileDriver {
    config: VnavConfig,
    builders: PathBuilders,
    simvars: Arc<dyn SimVarSource>,
    consumer: Option<Box<dyn ProfileConsumer>>,
    store: ProfileStore,
    trigger: CruiseAltitudeTrigger,
    geometry: Arc<LateralGeometry>,
}

impl VerticalProfileDriver {
    pub fn new(config: VnavConfig, builders: PathBuilders, simvars: Arc<dyn SimVarSource>) -> Self {
        Self {
            config,
            builders,
            simvars,
            consumer: None,
            store: ProfileStore::new(),
            trigger: CruiseAltitudeTrigger::new(),
            geometry: Arc::new(LateralGeometry::empty()),
        }
    }

    /// Register the consumer notified after each successful pass.
    pub fn set_consumer(&mut self, consumer: impl ProfileConsumer + 'static) {
        self.consumer = Some(Box::new(consumer));
    }

    /// Read handle on the published profiles, for consumers and other threads.
    pub fn reader(&self) -> ProfileReader {
        self.store.reader()
    }

    pub fn state(&self) -> DriverState {
        self.store.state()
    }

    pub fn snapshot(&self) -> Arc<ProfileSnapshot> {
        self.store.snapshot()
    }

    pub fn current_climb_profile(&self) -> Option<Arc<ClimbProfile>> {
        self.store.snapshot().climb.clone()
    }

    pub fn current_descent_profile(&self) -> Option<Arc<DescentProfile>> {
        self.store.snapshot().descent.clone()
    }

    pub fn current_approach_profile(&self) -> Option<Arc<ApproachProfile>> {
        self.store.snapshot().approach.clone()
    }

    /// Most recently delivered lateral geometry.
    pub fn geometry(&self) -> &LateralGeometry {
        &self.geometry
    }

    /// Cruise altitude the edge detector last accepted.
    pub fn last_cruise_altitude_ft(&self) -> f64 {
        self.trigger.last_ft()
    }

    /// New lateral geometry: always recompute.
    pub fn on_geometry_changed(
        &mut self,
        geometry: impl Into<Arc<LateralGeometry>>,
    ) -> Result<PassOutcome, DriverError> {
        self.geometry = geometry.into();
        let geometry = Arc::clone(&self.geometry);
        self.recompute(&geometry)
    }

    /// Host tick: recompute with the last known geometry if the cruise altitude changed.
    pub fn on_periodic_update(&mut self, _elapsed: Duration) -> Result<PassOutcome, DriverError> {
        let reading = self.simvars.scalar(keys::CRUISE_ALTITUDE);
        let Some(cruise_altitude_ft) = self.trigger.observe(reading) else {
            return Ok(PassOutcome::Unchanged);
        };

        debug!(
            cruise_altitude_ft,
            "computing new vertical profile because of new cruise altitude"
        );
        let geometry = Arc::clone(&self.geometry);
        self.recompute(&geometry)
    }

    fn recompute(&mut self, geometry: &LateralGeometry) -> Result<PassOutcome, DriverError> {
        self.store.set_state(DriverState::Recomputing);
        let outcome = self.run_pass(geometry);
        self.store.set_state(DriverState::Idle);

        match &outcome {
            Ok(PassOutcome::Published { .. }) => {
                if let Some(consumer) = self.consumer.as_mut() {
                    consumer.accept_vertical_profile();
                }
            }
            Ok(_) => {}
            Err(err) => warn!(%err, legs = geometry.len(), "vertical profile pass aborted"),
        }
        outcome
    }

    fn run_pass(&mut self, geometry: &LateralGeometry) -> Result<PassOutcome, DriverError> {
        self.builders.climb.update();

        if geometry.is_empty() {
            warn!("did not compute vertical profile: no legs in flight plan");
            return Ok(PassOutcome::SkippedEmptyGeometry);
        }

        if self.config.calculate_climb_profile {
            let climb = self.builders.climb.compute_climb_path(geometry)?;
            debug!(
                checkpoints = climb.checkpoints.len(),
                top_of_climb = ?climb.top_of_climb,
                "climb profile computed"
            );
            self.store.publish_climb(climb);
        }

        let approach = self.builders.decel.compute_decel_path(geometry)?;
        let descent = self
            .builders
            .descent
            .compute_descent_path(geometry, &approach)?;
        let generation = self.store.publish_approach_and_descent(approach, descent);
        Ok(PassOutcome::Published { generation })
    }
}

impl GuidanceComponent for VerticalProfileDriver {
    type Error = DriverError;

    fn init(&mut self) {
        info!(
            calculate_climb_profile = self.config.calculate_climb_profile,
            "vertical profile driver initialized"
        );
    }

    fn update(&mut self, delta: Duration) -> Result<(), DriverError> {
        self.on_periodic_update(delta).map(|_| ())
    }
}
