//! Named scalar data pulled from the host simulation.

use std::collections::HashMap;
use std::sync::RwLock;

/// Well-known simulation variable names.
pub mod keys {
    /// Selected cruise altitude, feet.
    pub const CRUISE_ALTITUDE: &str = "L:AIRLINER_CRUISE_ALTITUDE";
    /// Departure airport elevation, feet.
    pub const ORIGIN_ELEVATION: &str = "L:A32NX_ORIGIN_ELEVATION";
    /// Destination airport elevation, feet.
    pub const DESTINATION_ELEVATION: &str = "L:A32NX_DEST_ELEVATION";
}

/// Read access to scalar simulation variables.
///
/// `None` means the variable is not available; callers decide what that implies.
pub trait SimVarSource: Send + Sync {
    fn scalar(&self, key: &str) -> Option<f64>;
}

impl<F> SimVarSource for F
where
    F: Fn(&str) -> Option<f64> + Send + Sync,
{
    fn scalar(&self, key: &str) -> Option<f64> {
        self(key)
    }
}

/// In-memory variable table, writable from the host side.
#[derive(Debug, Default)]
pub struct SimVarStore {
    values: RwLock<HashMap<String, f64>>,
}

impl SimVarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or overwrite a variable.
    pub fn set(&self, key: impl Into<String>, value: f64) {
        let mut values = self.values.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        values.insert(key.into(), value);
    }
}

impl SimVarSource for SimVarStore {
    fn scalar(&self, key: &str) -> Option<f64> {
        let values = self.values.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        values.get(key).copied()
    }
}
