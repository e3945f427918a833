//! Configuration models and loaders for the vertical profile workspace.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use vnav_core::geometry::{LateralGeometry, Leg};

/// Switches controlling the vertical profile driver.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct VnavConfig {
    /// Whether the climb path is computed at all.
    pub calculate_climb_profile: bool,
    /// Raise diagnostics to debug level.
    pub debug: bool,
}

/// Performance figures consumed by the reference path builders.
#[derive(Debug, Deserialize, Clone)]
pub struct AircraftConfig {
    pub name: String,
    pub climb: ClimbPerformanceConfig,
    pub descent: DescentPerformanceConfig,
    pub approach: ApproachPerformanceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClimbPerformanceConfig {
    pub rate_fpm: f64,
    pub speed_kt: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DescentPerformanceConfig {
    pub flight_path_angle_deg: f64,
    pub speed_kt: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApproachPerformanceConfig {
    #[serde(default = "default_glide_path_angle")]
    pub glide_path_angle_deg: f64,
    #[serde(default = "default_stabilization_height")]
    pub stabilization_height_ft: f64,
    pub decel_start_speed_kt: f64,
    pub approach_speed_kt: f64,
    pub deceleration_kt_per_s: f64,
}

fn default_glide_path_angle() -> f64 {
    3.0
}

fn default_stabilization_height() -> f64 {
    1_000.0
}

/// Flight plan as stored on disk: a name and its lateral legs.
#[derive(Debug, Deserialize, Clone)]
pub struct FlightPlanConfig {
    pub name: String,
    #[serde(default)]
    pub legs: Vec<Leg>,
}

impl FlightPlanConfig {
    pub fn geometry(&self) -> LateralGeometry {
        LateralGeometry::new(self.legs.clone())
    }
}

/// Scripted sequence of host events replayed against the driver.
#[derive(Debug, Deserialize, Clone)]
pub struct SessionScript {
    #[serde(default)]
    pub origin_elevation_ft: Option<f64>,
    #[serde(default)]
    pub destination_elevation_ft: Option<f64>,
    pub events: Vec<SessionEvent>,
}

/// One host event.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Deliver a new lateral geometry, inline or from a flight plan file.
    Geometry {
        #[serde(default)]
        legs: Option<Vec<Leg>>,
        #[serde(default)]
        flight_plan: Option<PathBuf>,
    },
    /// Periodic tick, optionally changing the cruise altitude beforehand.
    Tick {
        #[serde(default = "default_tick_seconds")]
        elapsed_s: f64,
        #[serde(default)]
        cruise_altitude_ft: Option<f64>,
    },
    /// Write an arbitrary simulation variable.
    SetSimvar { key: String, value: f64 },
}

fn default_tick_seconds() -> f64 {
    0.1
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Load driver switches from a TOML file.
pub fn load_vnav_config<P: AsRef<Path>>(path: P) -> Result<VnavConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

/// Load aircraft performance records from a YAML file, a TOML file or a directory of TOML files.
pub fn load_aircraft<P: AsRef<Path>>(path: P) -> Result<Vec<AircraftConfig>, ConfigError> {
    let aircraft: Vec<AircraftConfig> = load_records(path)?;
    for entry in &aircraft {
        validate_aircraft(entry)?;
    }
    Ok(aircraft)
}

/// Load a single flight plan.
pub fn load_flight_plan<P: AsRef<Path>>(path: P) -> Result<FlightPlanConfig, ConfigError> {
    let plan: FlightPlanConfig = load_single(path)?;
    if let Some(leg) = plan.legs.iter().find(|leg| !(leg.length_nm >= 0.0)) {
        return Err(ConfigError::Invalid(format!(
            "leg '{}' of flight plan '{}' has a negative or undefined length",
            leg.ident, plan.name
        )));
    }
    Ok(plan)
}

/// Load a session script.
pub fn load_session<P: AsRef<Path>>(path: P) -> Result<SessionScript, ConfigError> {
    load_single(path)
}

/// Pick an aircraft by case-insensitive name, or the first entry when none is requested.
pub fn select_aircraft(
    catalog: &[AircraftConfig],
    requested: Option<&str>,
) -> Result<AircraftConfig, ConfigError> {
    let chosen = match requested {
        Some(name) => {
            let upper = name.to_uppercase();
            catalog.iter().find(|cfg| cfg.name.to_uppercase() == upper)
        }
        None => catalog.first(),
    };
    chosen.cloned().ok_or_else(|| {
        ConfigError::Invalid(match requested {
            Some(name) => format!("aircraft '{name}' not found in catalog"),
            None => "aircraft catalog is empty".to_string(),
        })
    })
}

fn validate_aircraft(aircraft: &AircraftConfig) -> Result<(), ConfigError> {
    let checks = [
        ("climb.rate_fpm", aircraft.climb.rate_fpm),
        ("climb.speed_kt", aircraft.climb.speed_kt),
        ("descent.flight_path_angle_deg", aircraft.descent.flight_path_angle_deg),
        ("descent.speed_kt", aircraft.descent.speed_kt),
        ("approach.glide_path_angle_deg", aircraft.approach.glide_path_angle_deg),
        ("approach.approach_speed_kt", aircraft.approach.approach_speed_kt),
        ("approach.deceleration_kt_per_s", aircraft.approach.deceleration_kt_per_s),
    ];
    for (field, value) in checks {
        if !(value.is_finite() && value > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "{}: {field} must be positive (got {value})",
                aircraft.name
            )));
        }
    }
    let stabilization_height_ft = aircraft.approach.stabilization_height_ft;
    if !(stabilization_height_ft.is_finite() && stabilization_height_ft >= 0.0) {
        return Err(ConfigError::Invalid(format!(
            "{}: approach.stabilization_height_ft must be finite and not negative (got {stabilization_height_ft})",
            aircraft.name
        )));
    }
    let decel_start_speed_kt = aircraft.approach.decel_start_speed_kt;
    if !(decel_start_speed_kt.is_finite()
        && decel_start_speed_kt >= aircraft.approach.approach_speed_kt)
    {
        return Err(ConfigError::Invalid(format!(
            "{}: approach.decel_start_speed_kt must not be below approach_speed_kt",
            aircraft.name
        )));
    }
    Ok(())
}

fn load_single<T, P>(path: P) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_toml(path))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|ext| ext == "toml").unwrap_or(false)
}
