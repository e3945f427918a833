use std::sync::Arc;
use std::time::Duration;

use vnav_profile::climb::{ClimbPathBuilder, ClimbPathError, ClimbPerformance, ConstantRateClimbBuilder};
use vnav_profile::config::{VnavConfig, load_aircraft, load_flight_plan, select_aircraft};
use vnav_profile::descent::{
    ApproachPerformance, ApproachProfile, ConstantDecelBuilder, DecelPathBuilder, DecelPathError,
    DescentPathBuilder, DescentPathError, DescentPerformance, GeometricDescentBuilder,
};
use vnav_profile::guidance::aircraft::reference_builders;
use vnav_profile::guidance::{PassOutcome, PseudoWaypointKind, PseudoWaypointRecorder, VerticalProfileDriver};
use vnav_profile::primitives::geometry::{AltitudeConstraint, LateralGeometry, Leg};
use vnav_profile::primitives::kinematics::altitude_change_on_path;
use vnav_profile::primitives::profile::{CheckpointReason, VerticalCheckpoint};
use vnav_profile::primitives::simvar::{SimVarStore, keys};
use vnav_profile::primitives::units::ft_to_nm;

const EPS: f64 = 1e-6;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

fn legs(lengths: &[f64]) -> LateralGeometry {
    LateralGeometry::new(
        lengths
            .iter()
            .enumerate()
            .map(|(i, length)| Leg::track_to_fix(format!("L{i}"), *length))
            .collect(),
    )
}

fn climb_builder(simvars: &Arc<SimVarStore>) -> ConstantRateClimbBuilder {
    ConstantRateClimbBuilder::new(
        ClimbPerformance {
            rate_fpm: 2_000.0,
            speed_kt: 300.0,
        },
        simvars.clone(),
    )
}

#[test]
fn climb_reaches_cruise_inside_second_leg() {
    let simvars = Arc::new(SimVarStore::new());
    simvars.set(keys::CRUISE_ALTITUDE, 10_000.0);
    let mut builder = climb_builder(&simvars);

    builder.update();
    let climb = builder.compute_climb_path(&legs(&[20.0, 40.0])).expect("climb");

    let reasons: Vec<_> = climb.checkpoints.iter().map(|c| c.reason).collect();
    assert_eq!(
        reasons,
        vec![
            CheckpointReason::Origin,
            CheckpointReason::LegEnd,
            CheckpointReason::TopOfClimb
        ]
    );
    assert_close(climb.checkpoints[1].altitude_ft, 8_000.0);
    let top = climb.top_of_climb.expect("top of climb");
    assert_close(top.distance_from_start_nm, 25.0);
    assert_close(top.altitude_ft, 10_000.0);
    assert_close(top.seconds_from_start, 300.0);
}

#[test]
fn climb_levels_off_below_constraint() {
    let simvars = Arc::new(SimVarStore::new());
    simvars.set(keys::CRUISE_ALTITUDE, 10_000.0);
    let mut builder = climb_builder(&simvars);
    let geometry = LateralGeometry::new(vec![
        Leg::track_to_fix("CONS", 20.0)
            .with_altitude_constraint(AltitudeConstraint::AtOrBelow { altitude_ft: 4_000.0 }),
        Leg::track_to_fix("NEXT", 40.0),
    ]);

    builder.update();
    let climb = builder.compute_climb_path(&geometry).expect("climb");

    let level_off = climb.checkpoints[1];
    assert_eq!(level_off.reason, CheckpointReason::AltitudeConstraint);
    assert_close(level_off.distance_from_start_nm, 10.0);
    assert_close(level_off.altitude_ft, 4_000.0);
    assert_eq!(climb.checkpoints[2].reason, CheckpointReason::LegEnd);
    assert_close(climb.checkpoints[2].altitude_ft, 4_000.0);
    assert_close(climb.top_of_climb.unwrap().distance_from_start_nm, 35.0);
}

#[test]
fn climb_without_top_when_geometry_too_short() {
    let simvars = Arc::new(SimVarStore::new());
    simvars.set(keys::CRUISE_ALTITUDE, 10_000.0);
    simvars.set(keys::ORIGIN_ELEVATION, 1_000.0);
    let mut builder = climb_builder(&simvars);

    builder.update();
    let climb = builder.compute_climb_path(&legs(&[10.0])).expect("climb");

    assert!(climb.top_of_climb.is_none());
    assert_close(climb.checkpoints[0].altitude_ft, 1_000.0);
    assert_close(climb.checkpoints.last().unwrap().altitude_ft, 5_000.0);
}

#[test]
fn climb_builder_requires_refresh_before_each_compute() {
    let simvars = Arc::new(SimVarStore::new());
    simvars.set(keys::CRUISE_ALTITUDE, 10_000.0);
    let mut builder = climb_builder(&simvars);
    let geometry = legs(&[50.0]);

    assert!(matches!(
        builder.compute_climb_path(&geometry),
        Err(ClimbPathError::StaleState)
    ));
    builder.update();
    assert!(builder.compute_climb_path(&geometry).is_ok());
    assert!(matches!(
        builder.compute_climb_path(&geometry),
        Err(ClimbPathError::StaleState)
    ));
}

#[test]
fn climb_fails_without_cruise_altitude() {
    let simvars = Arc::new(SimVarStore::new());
    let mut builder = climb_builder(&simvars);

    builder.update();

    assert!(matches!(
        builder.compute_climb_path(&legs(&[50.0])),
        Err(ClimbPathError::MissingCruiseAltitude)
    ));
}

fn approach_performance() -> ApproachPerformance {
    ApproachPerformance {
        glide_path_angle_deg: 3.0,
        stabilization_height_ft: 1_000.0,
        decel_start_speed_kt: 250.0,
        approach_speed_kt: 130.0,
        deceleration_kt_per_s: 1.0,
    }
}

#[test]
fn decel_path_ends_at_runway_elevation() {
    let simvars = Arc::new(SimVarStore::new());
    simvars.set(keys::DESTINATION_ELEVATION, 500.0);
    let builder = ConstantDecelBuilder::new(approach_performance(), simvars.clone());

    let approach = builder.compute_decel_path(&legs(&[60.0, 40.0])).expect("approach");

    let stabilized_nm = ft_to_nm(1_000.0 / 3.0_f64.to_radians().tan());
    let decel_nm = 190.0 / 3_600.0 * 120.0;
    let required_nm = stabilized_nm + decel_nm;

    assert_eq!(approach.checkpoints[0], approach.decel_point);
    assert_close(approach.decel_point.distance_from_start_nm, 100.0 - required_nm);
    assert_close(
        approach.decel_point.altitude_ft,
        500.0 + altitude_change_on_path(required_nm, 3.0),
    );
    let stabilized = approach.checkpoints[1];
    assert_eq!(stabilized.reason, CheckpointReason::ApproachSpeedReached);
    assert_close(stabilized.altitude_ft, 1_500.0);
    assert_close(stabilized.seconds_from_start, 120.0);
    let landing = approach.checkpoints[2];
    assert_eq!(landing.reason, CheckpointReason::Landing);
    assert_close(landing.distance_from_start_nm, 100.0);
    assert_close(landing.altitude_ft, 500.0);
    assert_close(approach.final_altitude_ft, 500.0);
}

#[test]
fn decel_path_rejects_short_geometry() {
    let simvars = Arc::new(SimVarStore::new());
    let builder = ConstantDecelBuilder::new(approach_performance(), simvars);

    let err = builder.compute_decel_path(&legs(&[5.0])).unwrap_err();

    match err {
        DecelPathError::GeometryTooShort {
            required_nm,
            available_nm,
        } => {
            assert_close(available_nm, 5.0);
            assert!(required_nm > 5.0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn decel_path_rejects_non_finite_performance() {
    let simvars = Arc::new(SimVarStore::new());
    let geometry = legs(&[60.0, 40.0]);
    let broken = [
        ApproachPerformance {
            decel_start_speed_kt: f64::NAN,
            ..approach_performance()
        },
        ApproachPerformance {
            stabilization_height_ft: f64::NAN,
            ..approach_performance()
        },
        ApproachPerformance {
            deceleration_kt_per_s: f64::INFINITY,
            ..approach_performance()
        },
    ];

    for performance in broken {
        let builder = ConstantDecelBuilder::new(performance, simvars.clone());
        assert!(matches!(
            builder.compute_decel_path(&geometry),
            Err(DecelPathError::InvalidPerformance(_))
        ));
    }
}

fn approach_at(distance_nm: f64, altitude_ft: f64) -> ApproachProfile {
    let decel_point = VerticalCheckpoint::new(
        CheckpointReason::DecelStart,
        distance_nm,
        altitude_ft,
        250.0,
        0.0,
    );
    ApproachProfile {
        checkpoints: vec![decel_point],
        decel_point,
        final_altitude_ft: 0.0,
    }
}

fn descent_builder(simvars: &Arc<SimVarStore>) -> GeometricDescentBuilder {
    GeometricDescentBuilder::new(
        DescentPerformance {
            flight_path_angle_deg: 3.0,
            speed_kt: 300.0,
        },
        simvars.clone(),
    )
}

#[test]
fn descent_starts_at_top_of_descent_and_ends_on_decel_point() {
    let simvars = Arc::new(SimVarStore::new());
    simvars.set(keys::CRUISE_ALTITUDE, 30_000.0);
    let builder = descent_builder(&simvars);
    let approach = approach_at(150.0, 3_000.0);

    let descent = builder
        .compute_descent_path(&legs(&[50.0, 50.0, 50.0, 50.0]), &approach)
        .expect("descent");

    let tod = 150.0 - ft_to_nm(27_000.0 / 3.0_f64.to_radians().tan());
    assert_close(descent.top_of_descent.distance_from_start_nm, tod);
    assert_close(descent.top_of_descent.altitude_ft, 30_000.0);
    assert_eq!(descent.approach_boundary, approach.decel_point);

    let reasons: Vec<_> = descent.checkpoints.iter().map(|c| c.reason).collect();
    assert_eq!(
        reasons,
        vec![
            CheckpointReason::TopOfDescent,
            CheckpointReason::LegEnd,
            CheckpointReason::DecelStart
        ]
    );
    assert_close(
        descent.checkpoints[1].altitude_ft,
        30_000.0 - altitude_change_on_path(100.0 - tod, 3.0),
    );
    let end = descent.checkpoints.last().unwrap();
    assert_close(end.distance_from_start_nm, 150.0);
    assert_close(end.altitude_ft, 3_000.0);
    assert_close(end.seconds_from_start, (150.0 - tod) / (300.0 / 3_600.0));
}

#[test]
fn descent_rejects_top_of_descent_before_origin() {
    let simvars = Arc::new(SimVarStore::new());
    simvars.set(keys::CRUISE_ALTITUDE, 30_000.0);
    let builder = descent_builder(&simvars);

    let err = builder
        .compute_descent_path(&legs(&[40.0]), &approach_at(30.0, 3_000.0))
        .unwrap_err();

    assert!(matches!(err, DescentPathError::GeometryTooShort { .. }));
}

#[test]
fn descent_fails_without_cruise_altitude() {
    let simvars = Arc::new(SimVarStore::new());
    let builder = descent_builder(&simvars);

    let err = builder
        .compute_descent_path(&legs(&[200.0]), &approach_at(190.0, 3_000.0))
        .unwrap_err();

    assert!(matches!(err, DescentPathError::MissingCruiseAltitude));
}

#[test]
fn reference_builders_drive_a_full_profile() {
    let catalog = load_aircraft("configs/aircraft").expect("aircraft catalog");
    let aircraft = select_aircraft(&catalog, Some("a320")).expect("A320");
    let plan = load_flight_plan("configs/flightplans/lfbo_lfpo.yaml").expect("flight plan");

    let simvars = Arc::new(SimVarStore::new());
    simvars.set(keys::ORIGIN_ELEVATION, 499.0);
    simvars.set(keys::DESTINATION_ELEVATION, 291.0);
    simvars.set(keys::CRUISE_ALTITUDE, 35_000.0);
    let config = VnavConfig {
        calculate_climb_profile: true,
        debug: false,
    };
    let mut driver = VerticalProfileDriver::new(
        config,
        reference_builders(&aircraft, simvars.clone()),
        simvars.clone(),
    );
    let recorder = PseudoWaypointRecorder::new(driver.reader());
    driver.set_consumer(recorder.clone());

    let outcome = driver.on_geometry_changed(plan.geometry()).expect("pass");
    assert!(matches!(outcome, PassOutcome::Published { .. }));

    let waypoints = recorder.pseudo_waypoints();
    let kinds: Vec<_> = waypoints.iter().map(|w| w.kind).collect();
    assert_eq!(
        kinds,
        vec![
            PseudoWaypointKind::TopOfClimb,
            PseudoWaypointKind::TopOfDescent,
            PseudoWaypointKind::Decel
        ]
    );
    assert!(waypoints[2].distance_from_start_nm < plan.geometry().total_length_nm());

    let climb = driver.current_climb_profile().expect("climb");
    assert!(
        climb
            .checkpoints
            .iter()
            .any(|c| c.reason == CheckpointReason::AltitudeConstraint)
    );

    // New cruise level moves both T/C and T/D.
    let top_of_descent = waypoints[1].distance_from_start_nm;
    simvars.set(keys::CRUISE_ALTITUDE, 37_000.0);
    driver
        .on_periodic_update(Duration::from_millis(100))
        .expect("tick");
    driver
        .on_periodic_update(Duration::from_millis(100))
        .expect("tick");
    let moved = recorder.pseudo_waypoints();
    assert!(moved[1].distance_from_start_nm < top_of_descent);
    assert_close(moved[0].altitude_ft, 37_000.0);
}
