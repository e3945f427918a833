//! Altitude-versus-distance rendering of a profile document.

use std::fs;
use std::path::Path;

use plotters::prelude::*;

use crate::{ExportError, ProfileDocument};

fn phase_color(phase: &str) -> RGBColor {
    match phase {
        "climb" => RGBColor(30, 120, 200),
        "descent" => RGBColor(200, 90, 30),
        _ => RGBColor(40, 160, 60),
    }
}

fn plot_err<E: std::fmt::Display>(err: E) -> ExportError {
    ExportError::Plot(err.to_string())
}

/// Render every phase as a polyline to a PNG file. No text is drawn.
pub fn render_altitude_plot(
    document: &ProfileDocument,
    output: &Path,
    size: (u32, u32),
) -> Result<(), ExportError> {
    let phases = document.phases();
    let points = phases.iter().flat_map(|(_, checkpoints)| checkpoints.iter());
    let (max_distance, max_altitude) = points.fold((0.0_f64, 0.0_f64), |(d, a), c| {
        (d.max(c.distance_from_start_nm), a.max(c.altitude_ft))
    });
    if phases.iter().all(|(_, checkpoints)| checkpoints.is_empty()) {
        return Err(ExportError::Empty);
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let root = BitMapBackend::new(output, size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let x_max = max_distance.max(1.0) * 1.02;
    let y_max = max_altitude.max(1_000.0) * 1.1;
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)
        .map_err(plot_err)?;

    let cruise = document.metadata.cruise_altitude_ft;
    if cruise > 0.0 {
        chart
            .draw_series(LineSeries::new(
                [(0.0, cruise), (x_max, cruise)],
                RGBColor(180, 180, 180).stroke_width(1),
            ))
            .map_err(plot_err)?;
    }

    for (phase, checkpoints) in &phases {
        let color = phase_color(phase);
        chart
            .draw_series(LineSeries::new(
                checkpoints
                    .iter()
                    .map(|c| (c.distance_from_start_nm, c.altitude_ft)),
                color.stroke_width(2),
            ))
            .map_err(plot_err)?;
        chart
            .draw_series(checkpoints.iter().map(|c| {
                Circle::new((c.distance_from_start_nm, c.altitude_ft), 3, color.filled())
            }))
            .map_err(plot_err)?;
    }

    root.present().map_err(plot_err)?;
    Ok(())
}
