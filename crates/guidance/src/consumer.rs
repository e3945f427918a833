//! Consumers notified when a new vertical profile has been published.

use std::sync::{Arc, Mutex};

use vnav_core::profile::VerticalCheckpoint;

use crate::store::ProfileReader;

/// Receives the zero-argument "new vertical profile" notification.
///
/// Called once the pass has settled: the snapshot is final and the driver
/// already reports [`DriverState::Idle`](crate::driver::DriverState::Idle).
/// Implementations pull the data they need through a [`ProfileReader`].
pub trait ProfileConsumer {
    fn accept_vertical_profile(&mut self);
}

impl<F> ProfileConsumer for F
where
    F: FnMut(),
{
    fn accept_vertical_profile(&mut self) {
        self()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoWaypointKind {
    TopOfClimb,
    TopOfDescent,
    Decel,
}

impl PseudoWaypointKind {
    /// Label shown on the navigation display.
    pub fn label(&self) -> &'static str {
        match self {
            PseudoWaypointKind::TopOfClimb => "(T/C)",
            PseudoWaypointKind::TopOfDescent => "(T/D)",
            PseudoWaypointKind::Decel => "(DECEL)",
        }
    }
}

/// Marker placed along the lateral path at a vertical event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PseudoWaypoint {
    pub kind: PseudoWaypointKind,
    pub distance_from_start_nm: f64,
    pub altitude_ft: f64,
    pub generation: u64,
}

impl PseudoWaypoint {
    fn at(kind: PseudoWaypointKind, checkpoint: &VerticalCheckpoint, generation: u64) -> Self {
        Self {
            kind,
            distance_from_start_nm: checkpoint.distance_from_start_nm,
            altitude_ft: checkpoint.altitude_ft,
            generation,
        }
    }
}

#[derive(Debug, Default)]
struct Placement {
    waypoints: Vec<PseudoWaypoint>,
    notifications: usize,
}

/// Reference consumer: re-places pseudo waypoints from the published snapshot.
///
/// Clones share the same placement, so a host can keep one clone for
/// inspection and hand another to the driver.
#[derive(Debug, Clone)]
pub struct PseudoWaypointRecorder {
    reader: ProfileReader,
    placement: Arc<Mutex<Placement>>,
}

impl PseudoWaypointRecorder {
    pub fn new(reader: ProfileReader) -> Self {
        Self {
            reader,
            placement: Arc::default(),
        }
    }

    /// Pseudo waypoints placed after the last notification, in along-track order.
    pub fn pseudo_waypoints(&self) -> Vec<PseudoWaypoint> {
        self.lock().waypoints.clone()
    }

    /// Number of notifications received.
    pub fn notifications(&self) -> usize {
        self.lock().notifications
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Placement> {
        self.placement
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ProfileConsumer for PseudoWaypointRecorder {
    fn accept_vertical_profile(&mut self) {
        let snapshot = self.reader.snapshot();
        let generation = snapshot.generation;

        let mut waypoints = Vec::with_capacity(3);
        if let Some(top) = snapshot.climb.as_ref().and_then(|climb| climb.top_of_climb) {
            waypoints.push(PseudoWaypoint::at(PseudoWaypointKind::TopOfClimb, &top, generation));
        }
        if let Some(descent) = &snapshot.descent {
            waypoints.push(PseudoWaypoint::at(
                PseudoWaypointKind::TopOfDescent,
                &descent.top_of_descent,
                generation,
            ));
        }
        if let Some(approach) = &snapshot.approach {
            waypoints.push(PseudoWaypoint::at(
                PseudoWaypointKind::Decel,
                &approach.decel_point,
                generation,
            ));
        }
        waypoints.sort_by(|a, b| a.distance_from_start_nm.total_cmp(&b.distance_from_start_nm));

        let mut placement = self.lock();
        placement.waypoints = waypoints;
        placement.notifications += 1;
    }
}
