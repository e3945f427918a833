//! Export helpers for vertical profile snapshots: JSON documents, CSV checkpoints and PNG plots.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vnav_climb::ClimbProfile;
use vnav_core::profile::VerticalCheckpoint;
use vnav_descent::{ApproachProfile, DescentProfile};

pub mod plot;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("plot rendering failed: {0}")]
    Plot(String),
    #[error("profile document has no checkpoints")]
    Empty,
}

/// Context recorded alongside an exported snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// RFC 3339 UTC timestamp of the export.
    pub generated_at: String,
    pub generation: u64,
    pub aircraft: String,
    pub flight_plan: String,
    pub cruise_altitude_ft: f64,
}

impl Metadata {
    /// Metadata stamped with the current UTC time.
    pub fn now(generation: u64, aircraft: &str, flight_plan: &str, cruise_altitude_ft: f64) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            generation,
            aircraft: aircraft.to_string(),
            flight_plan: flight_plan.to_string(),
            cruise_altitude_ft,
        }
    }
}

/// Self-contained copy of one published snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDocument {
    pub metadata: Metadata,
    pub climb: Option<ClimbProfile>,
    pub approach: Option<ApproachProfile>,
    pub descent: Option<DescentProfile>,
}

impl ProfileDocument {
    /// Checkpoints of every phase, tagged with the phase name, in phase order.
    pub fn phases(&self) -> Vec<(&'static str, &[VerticalCheckpoint])> {
        let mut phases = Vec::new();
        if let Some(climb) = &self.climb {
            phases.push(("climb", climb.checkpoints.as_slice()));
        }
        if let Some(descent) = &self.descent {
            phases.push(("descent", descent.checkpoints.as_slice()));
        }
        if let Some(approach) = &self.approach {
            phases.push(("approach", approach.checkpoints.as_slice()));
        }
        phases
    }
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

/// Write the document as pretty-printed JSON.
pub fn write_json(path: &Path, document: &ProfileDocument) -> Result<(), ExportError> {
    let mut writer = writer_for_path(path)?;
    serde_json::to_writer_pretty(&mut writer, document)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Read a document written by [`write_json`].
pub fn read_json(path: &Path) -> Result<ProfileDocument, ExportError> {
    let reader = io::BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// CSV row emitted by the checkpoint exporter.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CheckpointRow {
    pub phase: String,
    pub reason: String,
    pub distance_nm: f64,
    pub altitude_ft: f64,
    pub speed_kt: f64,
    pub seconds_from_phase_start: f64,
}

/// Write every checkpoint of the document as CSV, one row per checkpoint.
pub fn write_checkpoints_csv(path: &Path, document: &ProfileDocument) -> Result<usize, ExportError> {
    let mut writer = csv::Writer::from_writer(writer_for_path(path)?);
    let mut rows = 0;
    for (phase, checkpoints) in document.phases() {
        for checkpoint in checkpoints {
            writer.serialize(CheckpointRow {
                phase: phase.to_string(),
                reason: reason_label(checkpoint),
                distance_nm: checkpoint.distance_from_start_nm,
                altitude_ft: checkpoint.altitude_ft,
                speed_kt: checkpoint.speed_kt,
                seconds_from_phase_start: checkpoint.seconds_from_start,
            })?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

fn reason_label(checkpoint: &VerticalCheckpoint) -> String {
    serde_json::to_value(checkpoint.reason)
        .ok()
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("{:?}", checkpoint.reason))
}
