//! Box solid: tray cavities, lid seat, snap grooves, detent, grip lines,
//! gap partitions and poke holes.

use csg_kernel::{Axis, Kernel, SolidHandle};
use layout_engine::{BoxLayout, FillRegion};
use tracing::{debug, instrument};
use tray_types::BoxParams;

use crate::config::BuildConfig;
use crate::error::BuildError;
use crate::seat::{mirrored, to_back, SeatGeometry};

const GRIP_LINES: usize = 3;
const GRIP_DEPTH: f64 = 0.4;
const GRIP_HEIGHT: f64 = 0.8;
const GRIP_PITCH: f64 = 1.6;
/// Poke holes never take more than this share of a tray's short side.
const POKE_HOLE_SHARE: f64 = 0.35;

/// Build the box in its own frame, `[0, width] × [0, depth] × [0, height]`,
/// with the lid entry side at `y = 0`.
#[instrument(skip_all, fields(name = %layout.name))]
pub fn build_box(
    kernel: &mut dyn Kernel,
    layout: &BoxLayout,
    params: &BoxParams,
    config: &BuildConfig,
) -> Result<SolidHandle, BuildError> {
    let dims = &layout.dimensions;
    let seat = SeatGeometry::new(dims, &params.lid);
    let ov = config.cutter_overshoot;
    let segments = config.circle_segments;
    let block = kernel.cuboid([0.0; 3], [dims.width, dims.depth, dims.height])?;

    let mut tools = Vec::new();
    let mut additions = Vec::new();

    // One cavity per tray, tolerance on every side.
    for placed in layout.placed_trays() {
        let p = placed.placement;
        let tol = dims.tolerance;
        tools.push(kernel.cuboid(
            [
                placed.origin[0] - tol,
                placed.origin[1] - tol,
                dims.floor_thickness,
            ],
            [
                p.width + 2.0 * tol,
                p.depth + 2.0 * tol,
                dims.height - dims.floor_thickness + ov,
            ],
        )?);
    }

    // Gap partitions: hollow the gap, then restore a retaining wall.
    for region in layout.gap_fills.hollowed() {
        tools.push(region_cutter(kernel, region, ov)?);
    }
    for wall in layout.gap_fills.walls() {
        additions.push(kernel.cuboid(wall.min, wall.size())?);
    }

    tools.extend(seat_recess(kernel, &seat, ov)?);
    if params.lid.snap_enabled {
        let (grooves, chamfers) = snap_grooves(kernel, &seat, ov)?;
        tools.extend(grooves);
        additions.extend(chamfers);

        let c = params.lid.clearance;
        let radius = params.lid.snap_bump_height + c;
        let length = params.lid.snap_bump_width + 2.0 * c;
        tools.push(kernel.cylinder(
            Axis::X,
            [(dims.width - length) / 2.0, dims.wall_thickness / 2.0, dims.height],
            radius,
            length,
            segments,
        )?);
        debug!(radius, length, "detent notch");
    } else if params.lid.ramp_lock_enabled {
        tools.push(ramp_notch(kernel, &seat, params, ov)?);
    }
    tools.extend(grip_lines(kernel, &seat, dims.floor_thickness, ov)?);

    if params.poke_hole_diameter > 0.0 {
        for placed in layout.placed_trays() {
            let p = placed.placement;
            let radius = (params.poke_hole_diameter / 2.0)
                .min(POKE_HOLE_SHARE * p.width.min(p.depth));
            let [cx, cy] = placed.center();
            tools.push(kernel.cylinder(
                Axis::Z,
                [cx, cy, -ov],
                radius,
                dims.floor_thickness + 2.0 * ov,
                segments,
            )?);
        }
    }

    debug!(tools = tools.len(), additions = additions.len(), "cutting box");
    let mut solid = kernel.subtract_all(block, &tools)?;
    if let Some(extra) = kernel.union_all(&additions)? {
        let merged = kernel.union(solid, extra)?;
        kernel.release(solid);
        kernel.release(extra);
        solid = merged;
    }
    Ok(solid)
}

/// Region cutter grown upward so the hollow opens through the top face.
fn region_cutter(
    kernel: &mut dyn Kernel,
    region: &FillRegion,
    ov: f64,
) -> Result<SolidHandle, BuildError> {
    let [sx, sy, sz] = region.size();
    Ok(kernel.cuboid(region.min, [sx, sy, sz + ov])?)
}

/// Lower the outer band on the left, right and back.
fn seat_recess(
    kernel: &mut dyn Kernel,
    seat: &SeatGeometry,
    ov: f64,
) -> Result<Vec<SolidHandle>, BuildError> {
    let z = seat.seat_z;
    let h = seat.ledge + ov;
    let s = seat.inset;
    Ok(vec![
        kernel.cuboid([-ov, -ov, z], [s + ov, seat.depth + 2.0 * ov, h])?,
        kernel.cuboid([seat.width - s, -ov, z], [s + ov, seat.depth + 2.0 * ov, h])?,
        kernel.cuboid([-ov, seat.depth - s, z], [seat.width + 2.0 * ov, s + ov, h])?,
    ])
}

/// Grooves on the left, right and back, plus the chamfer wedges that make
/// their ceilings printable without support.
fn snap_grooves(
    kernel: &mut dyn Kernel,
    seat: &SeatGeometry,
    ov: f64,
) -> Result<(Vec<SolidHandle>, Vec<SolidHandle>), BuildError> {
    let groove = seat.groove_profile();
    let chamfer = seat.chamfer_profile();
    let (s, gd) = (seat.inset, seat.groove_depth);
    let side_end = seat.depth - s;
    let wedge_end = seat.side_run_end();

    let grooves = vec![
        kernel.extrude(&groove, Axis::Y, -ov, side_end + ov)?,
        kernel.extrude(&mirrored(seat, groove), Axis::Y, -ov, side_end + ov)?,
        kernel.extrude(&to_back(seat, groove), Axis::X, s, seat.width - 2.0 * s)?,
    ];
    // Wedges are added material: no overshoot, or they poke out of the
    // entry face.
    let chamfers = vec![
        kernel.extrude(&chamfer, Axis::Y, 0.0, wedge_end)?,
        kernel.extrude(&mirrored(seat, chamfer), Axis::Y, 0.0, wedge_end)?,
        kernel.extrude(&to_back(seat, chamfer), Axis::X, s + gd, seat.width - 2.0 * (s + gd))?,
    ];
    Ok((grooves, chamfers))
}

/// Ramp catch on the entry wall top: a slope falling toward +Y that ends in
/// a vertical face the lid's ramp drops behind.
fn ramp_notch(
    kernel: &mut dyn Kernel,
    seat: &SeatGeometry,
    params: &BoxParams,
    ov: f64,
) -> Result<SolidHandle, BuildError> {
    let lid = &params.lid;
    let h = seat.height;
    let y0 = (seat.wall - lid.ramp_length) / 2.0;
    let y1 = y0 + lid.ramp_length;
    let depth = lid.ramp_height + lid.clearance;
    let profile = [[y0, h], [y1, h - depth], [y1, h + ov], [y0, h + ov]];
    let length = lid.snap_bump_width + 2.0 * lid.clearance;
    Ok(kernel.extrude(&profile, Axis::X, (seat.width - length) / 2.0, length)?)
}

/// Shallow horizontal grooves on the exit wall's outer face, below the seat.
fn grip_lines(
    kernel: &mut dyn Kernel,
    seat: &SeatGeometry,
    floor: f64,
    ov: f64,
) -> Result<Vec<SolidHandle>, BuildError> {
    let mut tools = Vec::with_capacity(GRIP_LINES);
    let x0 = seat.width / 4.0;
    for k in 1..=GRIP_LINES {
        let z = seat.seat_z - GRIP_PITCH * k as f64;
        if z < floor {
            break;
        }
        tools.push(kernel.cuboid(
            [x0, seat.depth - GRIP_DEPTH, z],
            [seat.width / 2.0, GRIP_DEPTH + ov, GRIP_HEIGHT],
        )?);
    }
    Ok(tools)
}
