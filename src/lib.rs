//! Vertical profile prediction for a flight plan.
//!
//! The workspace crates are re-exported here so front-ends (the CLI today)
//! depend on a single library: geometry and units in [`primitives`], the
//! path builders in [`climb`] and [`descent`], the driver in [`guidance`].

pub use vnav_climb as climb;
pub use vnav_config as config;
pub use vnav_core as primitives;
pub use vnav_descent as descent;
pub use vnav_export as export;
pub use vnav_guidance as guidance;

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
