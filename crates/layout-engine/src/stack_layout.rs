//! Greedy two-row stack planner.
//!
//! Stacks are placed in a fixed priority: lengthwise edge-loaded slots first,
//! then crosswise edge-loaded slots packed into columns, then top-loaded
//! pockets. Each item goes to whichever row (front or back) is currently
//! shorter; nothing is ever moved once placed.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use tray_types::{EdgeOrientation, ShapeSpec, TrayParams};

use crate::error::{LayoutError, Result};
use crate::shape_metrics::{pocket_outline, resolve_shape, PocketOutline, ShapeMetrics};
use crate::validate::validate_tray_params;

/// Which of the two tray rows an item sits in. The front row is the one at
/// `y = wall`; the back row is anchored to the far wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Row {
    Front,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotKind {
    TopLoaded,
    Lengthwise,
    Crosswise,
}

impl SlotKind {
    pub fn is_edge_loaded(self) -> bool {
        !matches!(self, SlotKind::TopLoaded)
    }
}

/// One stack's footprint inside a tray, in tray-local millimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackPlacement {
    pub kind: SlotKind,
    /// Index into `top_loaded_stacks` or `edge_loaded_stacks`, per `kind`.
    pub source_index: usize,
    pub row: Row,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub depth: f64,
    /// Height of the counters in the pocket: stacked thickness for
    /// top-loaded pockets, standing height for edge-loaded slots.
    pub stack_height: f64,
    pub cutout_radius: f64,
    pub count: u32,
    pub shape: ShapeSpec,
    pub outline: PocketOutline,
    pub label: Option<String>,
}

impl StackPlacement {
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.depth
    }

    pub fn center(&self) -> [f64; 2] {
        [self.x + self.width / 2.0, self.y + self.depth / 2.0]
    }

    /// True when the footprints share interior area beyond `tol`.
    pub fn overlaps(&self, other: &StackPlacement, tol: f64) -> bool {
        self.x < other.max_x() - tol
            && other.x < self.max_x() - tol
            && self.y < other.max_y() - tol
            && other.y < self.max_y() - tol
    }
}

/// Planner output consumed by the tray dimension calculator and builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackLayout {
    pub placements: Vec<StackPlacement>,
    pub front_depth: f64,
    pub back_depth: f64,
    pub front_end_x: f64,
    pub back_end_x: f64,
    pub depth: f64,
}

impl StackLayout {
    /// X extent needed by the packed rows, including the trailing wall.
    pub fn packed_width(&self) -> f64 {
        self.front_end_x.max(self.back_end_x)
    }

    pub fn max_stack_height(&self) -> f64 {
        self.placements
            .iter()
            .map(|p| p.stack_height)
            .fold(0.0, f64::max)
    }

    pub fn in_row(&self, row: Row) -> impl Iterator<Item = &StackPlacement> {
        self.placements.iter().filter(move |p| p.row == row)
    }
}

/// A placement before the final tray depth fixes its `y`.
struct Pending {
    kind: SlotKind,
    source_index: usize,
    row: Row,
    x: f64,
    width: f64,
    depth: f64,
    stack_height: f64,
    cutout_radius: f64,
    count: u32,
    shape: ShapeSpec,
    label: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct Rows {
    front_x: f64,
    back_x: f64,
    front_depth: f64,
    back_depth: f64,
}

impl Rows {
    fn shorter(&self) -> Row {
        if self.back_x < self.front_x {
            Row::Back
        } else {
            Row::Front
        }
    }

    /// Reserve `advance` of row length and return the item's x offset.
    fn reserve(&mut self, row: Row, advance: f64, depth: f64) -> f64 {
        let (x, d) = match row {
            Row::Front => (&mut self.front_x, &mut self.front_depth),
            Row::Back => (&mut self.back_x, &mut self.back_depth),
        };
        let start = *x;
        *x += advance;
        *d = d.max(depth);
        start
    }
}

struct Column {
    front: usize,
    back: Option<usize>,
    front_depth: f64,
    width: f64,
}

fn cutout_radius(params: &TrayParams, dim: f64) -> f64 {
    params.cutout_max.min(dim * params.cutout_ratio)
}

/// Plan every stack of a tray. `subject` names the tray in errors.
#[instrument(skip(params), fields(stacks = params.stack_count()))]
pub fn plan_stacks(params: &TrayParams, subject: &str) -> Result<StackLayout> {
    validate_tray_params(params, subject)?;
    let wall = params.wall_thickness;
    let mut rows = Rows {
        front_x: wall,
        back_x: wall,
        front_depth: 0.0,
        back_depth: 0.0,
    };
    let mut pending: Vec<Pending> = Vec::with_capacity(params.stack_count());

    // Lengthwise: counters face the front, the stack runs along X.
    for (idx, stack) in params.edge_loaded_stacks.iter().enumerate() {
        if stack.orientation != EdgeOrientation::Lengthwise {
            continue;
        }
        let shape = resolve_shape(params, &stack.shape, subject)?;
        let m = ShapeMetrics::of(&shape, params);
        let width = f64::from(stack.count) * m.thickness;
        let depth = m.long_side + params.clearance;
        let radius = cutout_radius(params, depth);
        let row = rows.shorter();
        let x = rows.reserve(row, width + radius + wall, depth);
        debug!(index = idx, ?row, x, width, depth, "lengthwise slot placed");
        pending.push(Pending {
            kind: SlotKind::Lengthwise,
            source_index: idx,
            row,
            x,
            width,
            depth,
            stack_height: m.standing_height,
            cutout_radius: radius,
            count: stack.count,
            shape,
            label: stack.label.clone(),
        });
    }

    // Crosswise: the stack runs along Y, deepest first.
    let rows_established = rows.back_depth > 0.0;
    let mut crosswise = Vec::new();
    for (idx, stack) in params.edge_loaded_stacks.iter().enumerate() {
        if stack.orientation != EdgeOrientation::Crosswise {
            continue;
        }
        let shape = resolve_shape(params, &stack.shape, subject)?;
        let m = ShapeMetrics::of(&shape, params);
        let width = m.long_side + params.clearance;
        let depth = f64::from(stack.count) * m.thickness;
        crosswise.push(Pending {
            kind: SlotKind::Crosswise,
            source_index: idx,
            row: Row::Front,
            x: 0.0,
            width,
            depth,
            stack_height: m.standing_height,
            cutout_radius: cutout_radius(params, width),
            count: stack.count,
            shape,
            label: stack.label.clone(),
        });
    }
    crosswise.sort_by(|a, b| b.depth.total_cmp(&a.depth));

    let mut columns: Vec<Column> = Vec::new();
    for (i, slot) in crosswise.iter_mut().enumerate() {
        let span = rows.front_depth + wall + rows.back_depth;
        if rows_established && slot.depth > span {
            return Err(LayoutError::invalid(
                subject,
                format!(
                    "crosswise stack of {} '{}' spans {:.2}mm but the rows only allow {:.2}mm",
                    slot.count,
                    slot.shape.display_name(),
                    slot.depth,
                    span
                ),
            ));
        }
        let pair = columns.iter().position(|c| {
            c.back.is_none()
                && rows.back_depth > 0.0
                && c.front_depth + wall + slot.depth <= span + 1e-9
        });
        match pair {
            Some(ci) => {
                let col = &mut columns[ci];
                col.back = Some(i);
                col.width = col.width.max(slot.width);
                slot.row = Row::Back;
            }
            None => {
                rows.front_depth = rows.front_depth.max(slot.depth);
                columns.push(Column {
                    front: i,
                    back: None,
                    front_depth: slot.depth,
                    width: slot.width,
                });
            }
        }
    }
    let mut column_x = rows.front_x.max(rows.back_x);
    for col in &columns {
        crosswise[col.front].x = column_x;
        if let Some(back) = col.back {
            crosswise[back].x = column_x;
        }
        debug!(x = column_x, width = col.width, paired = col.back.is_some(), "crosswise column");
        column_x += col.width + wall;
    }
    if !columns.is_empty() {
        rows.front_x = column_x;
        rows.back_x = column_x;
    }
    pending.extend(crosswise);

    // Top-loaded pockets, largest footprint first.
    let mut top: Vec<(usize, ShapeSpec, ShapeMetrics)> = Vec::new();
    for (idx, stack) in params.top_loaded_stacks.iter().enumerate() {
        let shape = resolve_shape(params, &stack.shape, subject)?;
        let m = ShapeMetrics::of(&shape, params);
        top.push((idx, shape, m));
    }
    top.sort_by(|a, b| {
        let area = |m: &ShapeMetrics| m.pocket_width * m.pocket_length;
        area(&b.2).total_cmp(&area(&a.2))
    });
    for (idx, shape, m) in top {
        let stack = &params.top_loaded_stacks[idx];
        let row = rows.shorter();
        let x = rows.reserve(row, m.pocket_width + wall, m.pocket_length);
        debug!(index = idx, ?row, x, "top-loaded pocket placed");
        pending.push(Pending {
            kind: SlotKind::TopLoaded,
            source_index: idx,
            row,
            x,
            width: m.pocket_width,
            depth: m.pocket_length,
            stack_height: f64::from(stack.count) * m.thickness,
            cutout_radius: cutout_radius(params, m.pocket_width),
            count: stack.count,
            shape,
            label: stack.label.clone(),
        });
    }

    let mut depth = wall + rows.front_depth + wall;
    if rows.back_depth > 0.0 {
        depth += rows.back_depth + wall;
    }
    let placements = pending
        .into_iter()
        .map(|p| {
            let y = match p.row {
                Row::Front => wall,
                Row::Back => depth - wall - p.depth,
            };
            let outline = match p.kind {
                SlotKind::TopLoaded => pocket_outline(&p.shape, params.hex_pointy_top),
                _ => PocketOutline::Rectangle { corner_radius: 0.0 },
            };
            StackPlacement {
                kind: p.kind,
                source_index: p.source_index,
                row: p.row,
                x: p.x,
                y,
                width: p.width,
                depth: p.depth,
                stack_height: p.stack_height,
                cutout_radius: p.cutout_radius,
                count: p.count,
                shape: p.shape,
                outline,
                label: p.label,
            }
        })
        .collect();

    Ok(StackLayout {
        placements,
        front_depth: rows.front_depth,
        back_depth: rows.back_depth,
        front_end_x: rows.front_x,
        back_end_x: rows.back_x,
        depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tray_types::{BuiltinShape, CustomShape, EdgeLoadedStack, ShapeRef, TopLoadedStack};

    fn base() -> TrayParams {
        TrayParams::default()
    }

    #[test]
    fn lone_lengthwise_slot_fills_front_row() {
        let params = TrayParams {
            edge_loaded_stacks: vec![EdgeLoadedStack::lengthwise(BuiltinShape::Square, 10)],
            ..base()
        };
        let layout = plan_stacks(&params, "t").unwrap();
        let slot = &layout.placements[0];
        assert_eq!(slot.row, Row::Front);
        assert_relative_eq!(slot.width, 13.0, epsilon = 1e-9);
        assert_relative_eq!(slot.depth, 16.5);
        let radius = 12.0f64.min(16.5 * 0.3);
        assert_relative_eq!(layout.front_end_x, 2.0 + 13.0 + radius + 2.0, epsilon = 1e-9);
        assert_relative_eq!(layout.back_end_x, 2.0);
        assert_relative_eq!(layout.back_depth, 0.0);
        assert_relative_eq!(layout.depth, 2.0 + 16.5 + 2.0);
    }

    #[test]
    fn lengthwise_slots_alternate_rows() {
        let params = TrayParams {
            edge_loaded_stacks: vec![
                EdgeLoadedStack::lengthwise(BuiltinShape::Square, 10),
                EdgeLoadedStack::lengthwise(BuiltinShape::Square, 4),
                EdgeLoadedStack::lengthwise(BuiltinShape::Square, 4),
            ],
            ..base()
        };
        let layout = plan_stacks(&params, "t").unwrap();
        let rows: Vec<Row> = layout.placements.iter().map(|p| p.row).collect();
        assert_eq!(rows, vec![Row::Front, Row::Back, Row::Back]);
        assert_relative_eq!(layout.depth, 2.0 + 16.5 + 2.0 + 16.5 + 2.0);
    }

    #[test]
    fn crosswise_slot_pairs_into_back_row_when_it_fits() {
        let params = TrayParams {
            edge_loaded_stacks: vec![
                EdgeLoadedStack::lengthwise(BuiltinShape::Square, 10),
                EdgeLoadedStack::lengthwise(BuiltinShape::Square, 10),
                EdgeLoadedStack::crosswise(BuiltinShape::Square, 8),
                EdgeLoadedStack::crosswise(BuiltinShape::Square, 6),
            ],
            ..base()
        };
        let layout = plan_stacks(&params, "t").unwrap();
        let cross: Vec<&StackPlacement> = layout
            .placements
            .iter()
            .filter(|p| p.kind == SlotKind::Crosswise)
            .collect();
        assert_eq!(cross.len(), 2);
        assert_eq!(cross[0].row, Row::Front);
        assert_eq!(cross[1].row, Row::Back);
        assert_relative_eq!(cross[0].x, cross[1].x);
        assert!(!cross[0].overlaps(cross[1], 1e-9));
        // Back-row slots never widen the back row depth.
        assert_relative_eq!(layout.back_depth, 16.5);
    }

    #[test]
    fn crosswise_without_back_row_opens_columns() {
        let params = TrayParams {
            edge_loaded_stacks: vec![
                EdgeLoadedStack::crosswise(BuiltinShape::Square, 5),
                EdgeLoadedStack::crosswise(BuiltinShape::Square, 9),
            ],
            ..base()
        };
        let layout = plan_stacks(&params, "t").unwrap();
        assert!(layout.placements.iter().all(|p| p.row == Row::Front));
        // Deepest stack first.
        assert_eq!(layout.placements[0].count, 9);
        assert_relative_eq!(layout.placements[0].x, 2.0);
        assert_relative_eq!(layout.placements[1].x, 2.0 + 16.5 + 2.0);
        assert_relative_eq!(layout.front_end_x, layout.back_end_x);
    }

    #[test]
    fn oversized_crosswise_slot_is_rejected() {
        let params = TrayParams {
            edge_loaded_stacks: vec![
                EdgeLoadedStack::lengthwise(BuiltinShape::Square, 2),
                EdgeLoadedStack::lengthwise(BuiltinShape::Square, 2),
                EdgeLoadedStack::crosswise(BuiltinShape::Square, 40),
            ],
            ..base()
        };
        let err = plan_stacks(&params, "tray 'Long'").unwrap_err();
        assert!(err.to_string().starts_with("tray 'Long': crosswise stack of 40"));
    }

    #[test]
    fn top_loaded_sorted_by_area() {
        let params = TrayParams {
            custom_shapes: vec![CustomShape::rectangle("Card", 30.0, 40.0)],
            top_loaded_stacks: vec![
                TopLoadedStack::new(BuiltinShape::Square, 4),
                TopLoadedStack::new(ShapeRef::custom("Card"), 4),
            ],
            ..base()
        };
        let layout = plan_stacks(&params, "t").unwrap();
        assert_eq!(layout.placements[0].source_index, 1);
        assert_eq!(layout.placements[0].row, Row::Front);
        assert_eq!(layout.placements[1].row, Row::Back);
        let back = &layout.placements[1];
        assert_relative_eq!(back.max_y(), layout.depth - 2.0);
    }

    #[test]
    fn top_loaded_follow_edge_loaded_columns() {
        let params = TrayParams {
            edge_loaded_stacks: vec![EdgeLoadedStack::crosswise(BuiltinShape::Circle, 6)],
            top_loaded_stacks: vec![TopLoadedStack::new(BuiltinShape::Circle, 6)],
            ..base()
        };
        let layout = plan_stacks(&params, "t").unwrap();
        let top = layout
            .placements
            .iter()
            .find(|p| p.kind == SlotKind::TopLoaded)
            .unwrap();
        assert_relative_eq!(top.x, 2.0 + 16.5 + 2.0);
        assert_eq!(top.outline, PocketOutline::Circle);
    }
}
