//! Row-greedy placement of trays inside a box.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

const FIT_EPSILON: f64 = 1e-9;

/// Outer size of one tray, as the arranger sees it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrayFootprint {
    pub tray_id: Uuid,
    pub width: f64,
    pub depth: f64,
    pub height: f64,
}

/// A tray's position relative to the packed area's origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrayPlacement {
    pub tray_id: Uuid,
    pub row: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub depth: f64,
    pub height: f64,
}

impl TrayPlacement {
    pub fn center(&self) -> [f64; 2] {
        [self.x + self.width / 2.0, self.y + self.depth / 2.0]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrangement {
    /// In the same order as the input footprints.
    pub placements: Vec<TrayPlacement>,
    pub packed_width: f64,
    pub packed_depth: f64,
    pub row_count: usize,
}

impl Arrangement {
    pub fn placement(&self, tray_id: Uuid) -> Option<&TrayPlacement> {
        self.placements.iter().find(|p| p.tray_id == tray_id)
    }

    pub fn max_height(&self) -> f64 {
        self.placements.iter().map(|p| p.height).fold(0.0, f64::max)
    }
}

#[derive(Default)]
struct PackRow {
    fill: f64,
    depth: f64,
    members: Vec<usize>,
}

/// First-fit decreasing by width. Row capacity is the widest tray, or
/// `max_row_width` when that is larger. Trays in the first row are pushed to
/// the far end so the packed area has no internal gap along the front.
pub fn arrange_trays(footprints: &[TrayFootprint], max_row_width: Option<f64>) -> Arrangement {
    let widest = footprints.iter().map(|f| f.width).fold(0.0, f64::max);
    let capacity = max_row_width.map_or(widest, |m| m.max(widest));

    let mut order: Vec<usize> = (0..footprints.len()).collect();
    order.sort_by(|&a, &b| footprints[b].width.total_cmp(&footprints[a].width));

    let mut rows: Vec<PackRow> = Vec::new();
    let mut offsets = vec![0.0; footprints.len()];
    let mut row_of = vec![0usize; footprints.len()];
    for idx in order {
        let fp = &footprints[idx];
        let slot = rows
            .iter()
            .position(|r| r.fill + fp.width <= capacity + FIT_EPSILON);
        let r = match slot {
            Some(r) => r,
            None => {
                rows.push(PackRow::default());
                rows.len() - 1
            }
        };
        let row = &mut rows[r];
        offsets[idx] = row.fill;
        row_of[idx] = r;
        row.fill += fp.width;
        row.depth = row.depth.max(fp.depth);
        row.members.push(idx);
    }

    let packed_width = rows.iter().map(|r| r.fill).fold(0.0, f64::max);
    if let Some(first) = rows.first() {
        let shift = packed_width - first.fill;
        for &idx in &first.members {
            offsets[idx] += shift;
        }
    }
    let mut row_y = Vec::with_capacity(rows.len());
    let mut y = 0.0;
    for row in &rows {
        row_y.push(y);
        y += row.depth;
    }
    debug!(rows = rows.len(), packed_width, packed_depth = y, capacity, "trays arranged");

    let placements = footprints
        .iter()
        .enumerate()
        .map(|(idx, fp)| TrayPlacement {
            tray_id: fp.tray_id,
            row: row_of[idx],
            x: offsets[idx],
            y: row_y[row_of[idx]],
            width: fp.width,
            depth: fp.depth,
            height: fp.height,
        })
        .collect();
    Arrangement {
        placements,
        packed_width,
        packed_depth: y,
        row_count: rows.len(),
    }
}
