//! Tray solid: a block with pockets, finger cutouts, scoops and a name.

use csg_kernel::{Axis, Kernel, SolidHandle};
use layout_engine::{PocketOutline, Row, ScoopCell, SlotKind, StackPlacement, TrayLayout};
use tracing::{debug, instrument};
use tray_types::TrayParams;

use crate::config::BuildConfig;
use crate::error::BuildError;
use crate::text::TextOutline;

/// Build one tray in its local frame: `[0, width] × [0, depth] × [0, height]`
/// with the front row along `y = 0` and the name on the underside.
#[instrument(skip_all, fields(tray = %layout.name))]
pub fn build_tray(
    kernel: &mut dyn Kernel,
    layout: &TrayLayout,
    params: &TrayParams,
    config: &BuildConfig,
) -> Result<SolidHandle, BuildError> {
    let dims = &layout.dimensions;
    let block = kernel.cuboid([0.0; 3], [dims.width, dims.depth, dims.height])?;

    let mut tools = Vec::new();
    let cutter = TrayCutter {
        floor_z: dims.pocket_floor(params),
        top_z: dims.height + config.cutter_overshoot,
        depth: dims.depth,
        config,
    };
    for slot in &layout.stacks.placements {
        tools.push(cutter.pocket(kernel, slot)?);
    }
    tools.extend(cutter.finger_cutouts(kernel, &layout.stacks.placements, dims.height)?);
    for cell in &layout.scoop_cells {
        tools.push(cutter.scoop(kernel, cell)?);
    }
    if params.show_name {
        tools.extend(name_cutters(kernel, layout, cutter.floor_z, config)?);
    }
    debug!(tools = tools.len(), "cutting tray");
    Ok(kernel.subtract_all(block, &tools)?)
}

struct TrayCutter<'a> {
    floor_z: f64,
    top_z: f64,
    depth: f64,
    config: &'a BuildConfig,
}

impl TrayCutter<'_> {
    fn pocket(&self, kernel: &mut dyn Kernel, slot: &StackPlacement) -> Result<SolidHandle, BuildError> {
        let height = self.top_z - self.floor_z;
        let [cx, cy] = slot.center();
        let (x0, y0, x1, y1) = (slot.x, slot.y, slot.max_x(), slot.max_y());
        let handle = match slot.outline {
            PocketOutline::Rectangle { corner_radius } if corner_radius > 0.0 => {
                let profile = rounded_rect(x0, y0, x1, y1, corner_radius, self.config.circle_segments);
                kernel.extrude(&profile, Axis::Z, self.floor_z, height)?
            }
            PocketOutline::Rectangle { .. } => {
                kernel.cuboid([x0, y0, self.floor_z], [slot.width, slot.depth, height])?
            }
            PocketOutline::Hex { pointy_top: false } => {
                let qw = slot.width / 4.0;
                let profile = [
                    [x0, cy],
                    [cx - qw, y0],
                    [cx + qw, y0],
                    [x1, cy],
                    [cx + qw, y1],
                    [cx - qw, y1],
                ];
                kernel.extrude(&profile, Axis::Z, self.floor_z, height)?
            }
            PocketOutline::Hex { pointy_top: true } => {
                let qd = slot.depth / 4.0;
                let profile = [
                    [cx, y0],
                    [x1, cy - qd],
                    [x1, cy + qd],
                    [cx, y1],
                    [x0, cy + qd],
                    [x0, cy - qd],
                ];
                kernel.extrude(&profile, Axis::Z, self.floor_z, height)?
            }
            PocketOutline::Circle => kernel.cylinder(
                Axis::Z,
                [cx, cy, self.floor_z],
                slot.width.min(slot.depth) / 2.0,
                height,
                self.config.circle_segments,
            )?,
            PocketOutline::Triangle => {
                let profile = [[x0, y0], [x1, y0], [cx, y1]];
                kernel.extrude(&profile, Axis::Z, self.floor_z, height)?
            }
        };
        Ok(handle)
    }

    /// Vertical cutouts at the tray edge for top-loaded and crosswise
    /// pockets. Lengthwise slots get a horizontal cutout after the slot,
    /// shared with the next slot when that is lengthwise too.
    fn finger_cutouts(
        &self,
        kernel: &mut dyn Kernel,
        slots: &[StackPlacement],
        height: f64,
    ) -> Result<Vec<SolidHandle>, BuildError> {
        let mut tools = Vec::new();
        let segments = self.config.circle_segments;
        for row in [Row::Front, Row::Back] {
            let mut in_row: Vec<&StackPlacement> = slots.iter().filter(|s| s.row == row).collect();
            in_row.sort_by(|a, b| a.x.total_cmp(&b.x));
            for (i, slot) in in_row.iter().enumerate() {
                let r = slot.cutout_radius;
                if r <= 0.0 {
                    continue;
                }
                match slot.kind {
                    SlotKind::Lengthwise => {
                        let end = slot.max_x();
                        let cx = match in_row.get(i + 1) {
                            Some(next) if next.kind == SlotKind::Lengthwise => (end + next.x) / 2.0,
                            _ => end,
                        };
                        tools.push(kernel.cylinder(
                            Axis::Y,
                            [cx, slot.y, height],
                            r,
                            slot.depth,
                            segments,
                        )?);
                    }
                    SlotKind::TopLoaded | SlotKind::Crosswise => {
                        let edge_y = match row {
                            Row::Front => 0.0,
                            Row::Back => self.depth,
                        };
                        tools.push(kernel.cylinder(
                            Axis::Z,
                            [slot.center()[0], edge_y, self.floor_z],
                            r,
                            self.top_z - self.floor_z,
                            segments,
                        )?);
                    }
                }
            }
        }
        Ok(tools)
    }

    /// Trough with a rounded bottom running along X: the hull of two
    /// X-axis cylinders and the open box above them.
    fn scoop(&self, kernel: &mut dyn Kernel, cell: &ScoopCell) -> Result<SolidHandle, BuildError> {
        let radius = (cell.depth / 2.0).min((self.top_z - self.floor_z) / 2.0);
        let z = self.floor_z + radius;
        let segments = self.config.circle_segments;
        let front = kernel.cylinder(Axis::X, [cell.x, cell.y + radius, z], radius, cell.width, segments)?;
        let back = kernel.cylinder(
            Axis::X,
            [cell.x, cell.y + cell.depth - radius, z],
            radius,
            cell.width,
            segments,
        )?;
        let top = kernel.cuboid([cell.x, cell.y, z], [cell.width, cell.depth, self.top_z - z])?;
        let scoop = kernel.hull(&[front, back, top])?;
        for h in [front, back, top] {
            kernel.release(h);
        }
        Ok(scoop)
    }
}

/// Name recessed into the underside, mirrored so it reads from below.
fn name_cutters(
    kernel: &mut dyn Kernel,
    layout: &TrayLayout,
    floor_z: f64,
    config: &BuildConfig,
) -> Result<Vec<SolidHandle>, BuildError> {
    let dims = &layout.dimensions;
    if config.text_depth <= 0.0 || config.text_depth >= floor_z {
        debug!(floor_z, "floor too thin for name text");
        return Ok(Vec::new());
    }
    let margin = 2.0 * config.text_margin;
    let Some(text) = TextOutline::fit(
        &layout.name,
        dims.width - margin,
        dims.depth - margin,
        config.max_text_height,
    ) else {
        return Ok(Vec::new());
    };
    let placed = text
        .mirrored_x()
        .translated([dims.width / 2.0, dims.depth / 2.0]);
    let overshoot = config.cutter_overshoot;
    Ok(placed.cutters(kernel, -overshoot, config.text_depth + overshoot)?)
}

/// Convex rectangle with arc corners.
fn rounded_rect(x0: f64, y0: f64, x1: f64, y1: f64, radius: f64, segments: u32) -> Vec<[f64; 2]> {
    let r = radius.min((x1 - x0) / 2.0).min((y1 - y0) / 2.0);
    if r <= 1e-9 {
        return vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]];
    }
    let per_corner = (segments / 4).max(1);
    let corners = [
        ([x1 - r, y0 + r], -90.0f64),
        ([x1 - r, y1 - r], 0.0),
        ([x0 + r, y1 - r], 90.0),
        ([x0 + r, y0 + r], 180.0),
    ];
    let mut points = Vec::with_capacity(corners.len() * (per_corner as usize + 1));
    for (center, start) in corners {
        for k in 0..=per_corner {
            let a = (start + 90.0 * f64::from(k) / f64::from(per_corner)).to_radians();
            points.push([center[0] + r * a.cos(), center[1] + r * a.sin()]);
        }
    }
    points
}
