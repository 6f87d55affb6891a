//! Tray exterior dimensions and the per-tray layout bundle.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use tray_types::{Tray, TrayParams};
use uuid::Uuid;

use crate::error::{subject_name, Result};
use crate::stack_layout::{plan_stacks, StackLayout};

/// Scoop cells narrower than this are not worth cutting.
const MIN_SCOOP_CELL: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrayDimensions {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
    /// Height the stacks alone need: floor, tallest stack and rim.
    pub base_height: f64,
    /// Material added under every pocket to reach a shared target height.
    pub floor_spacer: f64,
    /// X extent of the packed rows, before any width override.
    pub packed_width: f64,
}

impl TrayDimensions {
    /// Z of every pocket floor.
    pub fn pocket_floor(&self, params: &TrayParams) -> f64 {
        params.floor_thickness + self.floor_spacer
    }
}

/// Tray dimensions for a planned layout. A width override wins outright,
/// even when smaller than the packed rows. `target_height` only ever raises
/// the tray, by thickening the floor.
pub fn tray_dimensions(
    params: &TrayParams,
    layout: &StackLayout,
    target_height: Option<f64>,
) -> TrayDimensions {
    let packed_width = layout.packed_width();
    let width = params.width_override().unwrap_or(packed_width);
    let base_height = params.floor_thickness + layout.max_stack_height() + params.rim_height;
    let height = target_height.map_or(base_height, |t| t.max(base_height));
    TrayDimensions {
        width,
        depth: layout.depth,
        height,
        base_height,
        floor_spacer: height - base_height,
        packed_width,
    }
}

/// A rounded-bottom auxiliary compartment in leftover tray length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoopCell {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub depth: f64,
}

/// Split the span between the packed rows and the far wall into a grid of
/// `extra_cols × max(extra_rows, 1)` cells.
pub fn scoop_cells(params: &TrayParams, dims: &TrayDimensions) -> Vec<ScoopCell> {
    if params.extra_cols == 0 {
        return Vec::new();
    }
    let wall = params.wall_thickness;
    let cols = params.extra_cols;
    let rows = params.extra_rows.max(1);
    let span_x = dims.width - wall - dims.packed_width;
    let span_y = dims.depth - 2.0 * wall;
    let cell_w = (span_x - f64::from(cols - 1) * wall) / f64::from(cols);
    let cell_d = (span_y - f64::from(rows - 1) * wall) / f64::from(rows);
    if cell_w < MIN_SCOOP_CELL || cell_d < MIN_SCOOP_CELL {
        debug!(span_x, span_y, "no room for scoop cells");
        return Vec::new();
    }
    let mut cells = Vec::with_capacity((cols * rows) as usize);
    for c in 0..cols {
        for r in 0..rows {
            cells.push(ScoopCell {
                x: dims.packed_width + f64::from(c) * (cell_w + wall),
                y: wall + f64::from(r) * (cell_d + wall),
                width: cell_w,
                depth: cell_d,
            });
        }
    }
    cells
}

/// Everything the builder and the analysis tools need about one tray.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrayLayout {
    pub tray_id: Uuid,
    pub name: String,
    pub stacks: StackLayout,
    pub dimensions: TrayDimensions,
    pub scoop_cells: Vec<ScoopCell>,
}

#[instrument(skip(tray), fields(tray = %tray.name))]
pub fn compute_tray_layout(tray: &Tray, target_height: Option<f64>) -> Result<TrayLayout> {
    let subject = subject_name("tray", &tray.name);
    let stacks = plan_stacks(&tray.params, &subject)?;
    let dimensions = tray_dimensions(&tray.params, &stacks, target_height);
    let scoop_cells = scoop_cells(&tray.params, &dimensions);
    debug!(
        width = dimensions.width,
        depth = dimensions.depth,
        height = dimensions.height,
        "tray dimensions"
    );
    Ok(TrayLayout {
        tray_id: tray.id,
        name: tray.name.clone(),
        stacks,
        dimensions,
        scoop_cells,
    })
}
