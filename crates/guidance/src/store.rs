//! Published vertical profile snapshots.
//!
//! The driver is the only writer. Readers hold a [`ProfileReader`] and always
//! get a complete snapshot: new snapshots are assembled off-lock and swapped in.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use vnav_climb::ClimbProfile;
use vnav_descent::{ApproachProfile, DescentProfile};

use crate::driver::DriverState;

/// Immutable view of the currently published profiles.
#[derive(Debug, Clone, Default)]
pub struct ProfileSnapshot {
    /// Incremented on every publication.
    pub generation: u64,
    pub climb: Option<Arc<ClimbProfile>>,
    pub approach: Option<Arc<ApproachProfile>>,
    pub descent: Option<Arc<DescentProfile>>,
}

#[derive(Debug, Default)]
struct Shared {
    snapshot: RwLock<Arc<ProfileSnapshot>>,
    recomputing: AtomicBool,
}

impl Shared {
    fn load(&self) -> Arc<ProfileSnapshot> {
        let guard = self
            .snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    fn state(&self) -> DriverState {
        if self.recomputing.load(Ordering::Acquire) {
            DriverState::Recomputing
        } else {
            DriverState::Idle
        }
    }
}

/// Write side of the published profiles, owned by the driver.
#[derive(Debug, Default)]
pub struct ProfileStore {
    shared: Arc<Shared>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cloneable read handle.
    pub fn reader(&self) -> ProfileReader {
        ProfileReader {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn snapshot(&self) -> Arc<ProfileSnapshot> {
        self.shared.load()
    }

    pub fn state(&self) -> DriverState {
        self.shared.state()
    }

    pub(crate) fn set_state(&self, state: DriverState) {
        self.shared
            .recomputing
            .store(state == DriverState::Recomputing, Ordering::Release);
    }

    /// Replace the climb profile, keeping approach and descent as they are.
    pub(crate) fn publish_climb(&self, climb: ClimbProfile) -> u64 {
        self.replace(|next| next.climb = Some(Arc::new(climb)))
    }

    /// Replace approach and descent in one write so they always come from the same pass.
    pub(crate) fn publish_approach_and_descent(
        &self,
        approach: ApproachProfile,
        descent: DescentProfile,
    ) -> u64 {
        self.replace(|next| {
            next.approach = Some(Arc::new(approach));
            next.descent = Some(Arc::new(descent));
        })
    }

    fn replace(&self, update: impl FnOnce(&mut ProfileSnapshot)) -> u64 {
        let mut guard = self
            .shared
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut next = ProfileSnapshot::clone(&guard);
        next.generation += 1;
        update(&mut next);
        let generation = next.generation;
        *guard = Arc::new(next);
        generation
    }
}

/// Read-only handle on the published profiles.
#[derive(Debug, Clone)]
pub struct ProfileReader {
    shared: Arc<Shared>,
}

impl ProfileReader {
    pub fn snapshot(&self) -> Arc<ProfileSnapshot> {
        self.shared.load()
    }

    /// Whether the driver is in the middle of a recomputation pass.
    pub fn driver_state(&self) -> DriverState {
        self.shared.state()
    }
}
