use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;
use vnav_profile::config::{
    SessionEvent, VnavConfig, load_aircraft, load_flight_plan, load_session, load_vnav_config,
    select_aircraft,
};
use vnav_profile::export::{Metadata, ProfileDocument, write_checkpoints_csv, write_json};
use vnav_profile::guidance::aircraft::reference_builders;
use vnav_profile::guidance::{
    GuidanceComponent, PassOutcome, PseudoWaypointRecorder, VerticalProfileDriver,
};
use vnav_profile::primitives::geometry::LateralGeometry;
use vnav_profile::primitives::simvar::{SimVarSource, SimVarStore, keys};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Replay a guidance session through the vertical profile driver"
)]
struct Cli {
    /// Session script (YAML or TOML) with geometry, tick and simvar events
    #[arg(long)]
    session: PathBuf,

    /// Driver switches (TOML); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Aircraft performance catalog (file or directory)
    #[arg(long, default_value = "configs/aircraft")]
    aircraft: PathBuf,

    /// Aircraft name from the catalog (defaults to the first entry)
    #[arg(long)]
    aircraft_name: Option<String>,

    /// Force climb profile computation on, whatever the config says
    #[arg(long, default_value_t = false)]
    climb: bool,

    /// Write the final snapshot as JSON (`-` for stdout)
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the final checkpoints as CSV (`-` for stdout)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Debug-level diagnostics
    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_vnav_config(path)
            .with_context(|| format!("loading driver config {}", path.display()))?,
        None => VnavConfig::default(),
    };
    config.calculate_climb_profile |= cli.climb;
    init_tracing(cli.verbose || config.debug);

    let catalog = load_aircraft(&cli.aircraft)
        .with_context(|| format!("loading aircraft catalog {}", cli.aircraft.display()))?;
    let aircraft = select_aircraft(&catalog, cli.aircraft_name.as_deref())?;
    let session = load_session(&cli.session)
        .with_context(|| format!("loading session {}", cli.session.display()))?;
    let session_dir = cli
        .session
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let simvars = Arc::new(SimVarStore::new());
    if let Some(elevation) = session.origin_elevation_ft {
        simvars.set(keys::ORIGIN_ELEVATION, elevation);
    }
    if let Some(elevation) = session.destination_elevation_ft {
        simvars.set(keys::DESTINATION_ELEVATION, elevation);
    }

    let builders = reference_builders(&aircraft, simvars.clone());
    let mut driver = VerticalProfileDriver::new(config, builders, simvars.clone());
    let recorder = PseudoWaypointRecorder::new(driver.reader());
    driver.set_consumer(recorder.clone());
    driver.init();

    let mut flight_plan_name = String::from("none");
    let mut passes = 0usize;
    let mut failures = 0usize;

    for (index, event) in session.events.iter().enumerate() {
        let (label, outcome) = match event {
            SessionEvent::Geometry { legs, flight_plan } => {
                let geometry = match (legs, flight_plan) {
                    (Some(legs), _) => {
                        flight_plan_name = String::from("inline");
                        LateralGeometry::new(legs.clone())
                    }
                    (None, Some(path)) => {
                        let plan = load_flight_plan(session_dir.join(path))
                            .with_context(|| format!("loading flight plan {}", path.display()))?;
                        flight_plan_name = plan.name.clone();
                        plan.geometry()
                    }
                    (None, None) => LateralGeometry::empty(),
                };
                let label = format!("geometry ({} legs)", geometry.len());
                (label, driver.on_geometry_changed(geometry))
            }
            SessionEvent::Tick {
                elapsed_s,
                cruise_altitude_ft,
            } => {
                if let Some(altitude) = cruise_altitude_ft {
                    simvars.set(keys::CRUISE_ALTITUDE, *altitude);
                }
                let elapsed = Duration::try_from_secs_f64(elapsed_s.max(0.0)).unwrap_or_default();
                let label = format!("tick (cruise {:.0} ft)", current_cruise(&simvars));
                (label, driver.on_periodic_update(elapsed))
            }
            SessionEvent::SetSimvar { key, value } => {
                simvars.set(key.clone(), *value);
                println!("[{index:>3}] simvar {key} = {value}");
                continue;
            }
        };

        match outcome {
            Ok(PassOutcome::Published { generation }) => {
                passes += 1;
                println!("[{index:>3}] {label}: published generation {generation}");
            }
            Ok(PassOutcome::SkippedEmptyGeometry) => {
                println!("[{index:>3}] {label}: skipped, no legs");
            }
            Ok(PassOutcome::Unchanged) => {
                println!("[{index:>3}] {label}: unchanged");
            }
            Err(err) => {
                failures += 1;
                error!(%err, event = index, "recomputation failed");
                println!("[{index:>3}] {label}: failed ({err})");
            }
        }
    }

    let snapshot = driver.snapshot();
    println!("=== Vertical Profile ===");
    println!("Aircraft        : {}", aircraft.name);
    println!("Flight plan     : {flight_plan_name}");
    println!("Passes          : {passes} published, {failures} failed");
    println!("Generation      : {}", snapshot.generation);
    println!(
        "Cruise altitude : {:.0} ft",
        driver.last_cruise_altitude_ft()
    );
    for waypoint in recorder.pseudo_waypoints() {
        println!(
            "{:<16}: {:>7.1} NM, {:>6.0} ft",
            waypoint.kind.label(),
            waypoint.distance_from_start_nm,
            waypoint.altitude_ft
        );
    }

    if cli.json.is_some() || cli.csv.is_some() {
        let document = ProfileDocument {
            metadata: Metadata::now(
                snapshot.generation,
                &aircraft.name,
                &flight_plan_name,
                driver.last_cruise_altitude_ft(),
            ),
            climb: snapshot.climb.as_deref().cloned(),
            approach: snapshot.approach.as_deref().cloned(),
            descent: snapshot.descent.as_deref().cloned(),
        };
        if let Some(path) = &cli.json {
            write_json(path, &document)?;
        }
        if let Some(path) = &cli.csv {
            write_checkpoints_csv(path, &document)?;
        }
    }

    Ok(())
}

fn current_cruise(simvars: &SimVarStore) -> f64 {
    simvars.scalar(keys::CRUISE_ALTITUDE).unwrap_or(0.0)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
