//! Approach deceleration and descent path prediction.
//!
//! The descent is anchored on the deceleration path: its lower boundary is the
//! decel point of the [`ApproachProfile`] it is built from.

pub mod decel;
pub mod descent;

pub use decel::{ApproachPerformance, ApproachProfile, ConstantDecelBuilder, DecelPathBuilder, DecelPathError};
pub use descent::{
    DescentPathBuilder, DescentPathError, DescentPerformance, DescentProfile,
    GeometricDescentBuilder,
};
