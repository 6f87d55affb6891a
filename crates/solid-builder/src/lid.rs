//! Sliding lid: a plate with an open-ended underside cavity, rails that run
//! in the box grooves, a detent bump or ramp, and the box name on top.

use csg_kernel::{Axis, Kernel, SolidHandle};
use layout_engine::BoxLayout;
use nalgebra::Matrix4;
use tracing::{debug, instrument};
use tray_types::BoxParams;

use crate::config::BuildConfig;
use crate::error::BuildError;
use crate::seat::{mirrored, to_back, SeatGeometry};
use crate::text::TextOutline;

/// Overall lid height. At least `ledge_height + thickness`, so the plate can
/// drop onto the lowered seat band and still sit flush with the box top.
pub fn lid_height(params: &BoxParams) -> f64 {
    (2.0 * params.wall_thickness).max(params.lid.ledge_height + params.lid.thickness)
}

/// Build the lid in print orientation: top face on the bed, cavity facing up.
#[instrument(skip_all, fields(name = %layout.name))]
pub fn build_lid(
    kernel: &mut dyn Kernel,
    layout: &BoxLayout,
    params: &BoxParams,
    config: &BuildConfig,
) -> Result<SolidHandle, BuildError> {
    let seat = SeatGeometry::new(&layout.dimensions, &params.lid);
    let assembled = build_lid_assembled(kernel, layout, params, config)?;
    let flipped = kernel.transform(assembled, &print_flip(seat.depth, lid_height(params)))?;
    kernel.release(assembled);
    Ok(flipped)
}

/// Lid in the box frame shifted down to the seat: `z = 0` is where the lip
/// rests on the lowered band.
pub fn build_lid_assembled(
    kernel: &mut dyn Kernel,
    layout: &BoxLayout,
    params: &BoxParams,
    config: &BuildConfig,
) -> Result<SolidHandle, BuildError> {
    let lid = &params.lid;
    let seat = SeatGeometry::new(&layout.dimensions, lid);
    let (w, d) = (seat.width, seat.depth);
    let height = lid_height(params);
    let ov = config.cutter_overshoot;
    let (s, c) = (seat.inset, seat.clearance);

    let block = kernel.cuboid([0.0; 3], [w, d, height])?;
    let mut tools = vec![kernel.cuboid(
        [s - c, -ov, -ov],
        [w - 2.0 * (s - c), d - s + c + ov, lid.ledge_height + ov],
    )?];
    if lid.show_name {
        tools.extend(name_cutters(kernel, &layout.name, w, d, height, config)?);
    }
    let mut solid = kernel.subtract_all(block, &tools)?;

    let mut additions = Vec::new();
    if lid.snap_enabled {
        let rail = seat.rail_profile(lid.rail_height);
        let run = seat.side_run_end();
        additions.push(kernel.extrude(&rail, Axis::Y, 0.0, run)?);
        additions.push(kernel.extrude(&mirrored(&seat, rail), Axis::Y, 0.0, run)?);
        additions.push(kernel.extrude(&to_back(&seat, rail), Axis::X, s, w - 2.0 * s)?);
        additions.push(kernel.cylinder(
            Axis::X,
            [(w - lid.snap_bump_width) / 2.0, seat.wall / 2.0, lid.ledge_height],
            lid.snap_bump_height,
            lid.snap_bump_width,
            config.circle_segments,
        )?);
    } else if lid.ramp_lock_enabled {
        additions.push(ramp_tooth(kernel, params, &seat)?);
    }
    debug!(additions = additions.len(), "lid features");
    if let Some(extra) = kernel.union_all(&additions)? {
        let merged = kernel.union(solid, extra)?;
        kernel.release(solid);
        kernel.release(extra);
        solid = merged;
    }
    Ok(solid)
}

/// Tooth under the entry lip matching the box's ramp notch, one clearance
/// smaller on the catch side.
fn ramp_tooth(
    kernel: &mut dyn Kernel,
    params: &BoxParams,
    seat: &SeatGeometry,
) -> Result<SolidHandle, BuildError> {
    let lid = &params.lid;
    let ledge = lid.ledge_height;
    let y0 = (seat.wall - lid.ramp_length) / 2.0;
    let y1 = y0 + lid.ramp_length - lid.clearance;
    let drop = lid.ramp_height * (y1 - y0) / lid.ramp_length;
    let anchor = ledge + lid.thickness / 2.0;
    let profile = [[y0, ledge], [y1, ledge - drop], [y1, anchor], [y0, anchor]];
    Ok(kernel.extrude(
        &profile,
        Axis::X,
        (seat.width - lid.snap_bump_width) / 2.0,
        lid.snap_bump_width,
    )?)
}

/// Box name recessed into the top face, running along the longer side.
fn name_cutters(
    kernel: &mut dyn Kernel,
    name: &str,
    width: f64,
    depth: f64,
    height: f64,
    config: &BuildConfig,
) -> Result<Vec<SolidHandle>, BuildError> {
    let margin = 2.0 * config.text_margin;
    let along_y = depth > width;
    let (run, across) = if along_y {
        (depth - margin, width - margin)
    } else {
        (width - margin, depth - margin)
    };
    let Some(text) = TextOutline::fit(name, run, across, config.max_text_height) else {
        return Ok(Vec::new());
    };
    let text = if along_y { text.rotated_quarter() } else { text };
    let placed = text.translated([width / 2.0, depth / 2.0]);
    let z0 = height - config.text_depth;
    Ok(placed.cutters(kernel, z0, config.text_depth + config.cutter_overshoot)?)
}

/// Half turn about X, keeping the lid in the positive octant.
fn print_flip(depth: f64, height: f64) -> Matrix4<f64> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0, //
        0.0, -1.0, 0.0, depth, //
        0.0, 0.0, -1.0, height, //
        0.0, 0.0, 0.0, 1.0,
    )
}
