//! Lateral flight-plan geometry as seen by the vertical guidance.
//!
//! The geometry is owned by whoever builds the lateral path; vertical
//! guidance only reads it, leg by leg, in flight order.

use serde::{Deserialize, Serialize};

/// Path terminator of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegKind {
    TrackToFix,
    DirectToFix,
    CourseToAltitude,
    RadiusToFix,
    Hold,
}

/// Altitude restriction attached to the terminating fix of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AltitudeConstraint {
    At { altitude_ft: f64 },
    AtOrAbove { altitude_ft: f64 },
    AtOrBelow { altitude_ft: f64 },
    Range { lower_ft: f64, upper_ft: f64 },
}

impl AltitudeConstraint {
    /// Highest altitude the constraint allows at its fix, if it caps the altitude.
    pub fn ceiling_ft(&self) -> Option<f64> {
        match *self {
            AltitudeConstraint::At { altitude_ft } => Some(altitude_ft),
            AltitudeConstraint::AtOrBelow { altitude_ft } => Some(altitude_ft),
            AltitudeConstraint::Range { upper_ft, .. } => Some(upper_ft),
            AltitudeConstraint::AtOrAbove { .. } => None,
        }
    }
}

/// Single flight-plan leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub ident: String,
    pub kind: LegKind,
    pub length_nm: f64,
    #[serde(default)]
    pub altitude_constraint: Option<AltitudeConstraint>,
    #[serde(default)]
    pub speed_constraint_kt: Option<f64>,
}

impl Leg {
    /// Unconstrained track-to-fix leg.
    pub fn track_to_fix(ident: impl Into<String>, length_nm: f64) -> Self {
        Self {
            ident: ident.into(),
            kind: LegKind::TrackToFix,
            length_nm,
            altitude_constraint: None,
            speed_constraint_kt: None,
        }
    }

    /// Attach an altitude constraint to the terminating fix.
    pub fn with_altitude_constraint(mut self, constraint: AltitudeConstraint) -> Self {
        self.altitude_constraint = Some(constraint);
        self
    }
}

/// Ordered leg sequence of the active flight plan. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LateralGeometry {
    #[serde(default)]
    pub legs: Vec<Leg>,
}

impl LateralGeometry {
    pub fn new(legs: Vec<Leg>) -> Self {
        Self { legs }
    }

    /// Geometry with no legs.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    /// Sum of leg lengths.
    pub fn total_length_nm(&self) -> f64 {
        self.legs.iter().map(|leg| leg.length_nm.max(0.0)).sum()
    }

    /// Iterate legs together with the along-track distance of their terminating fix.
    pub fn legs_with_distance(&self) -> impl Iterator<Item = (&Leg, f64)> + '_ {
        self.legs.iter().scan(0.0_f64, |distance, leg| {
            *distance += leg.length_nm.max(0.0);
            Some((leg, *distance))
        })
    }
}
