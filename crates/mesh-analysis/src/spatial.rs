//! Spatial fit check: box interior against the packed tray footprint.
//!
//! Exterior sizes come from the generated meshes and positions from the
//! layout, so the arithmetic `gap = exterior − walls − packed footprint` can
//! be reproduced from the exported parts alone.

use layout_engine::BoxLayout;
use serde::{Deserialize, Serialize};
use solid_builder::{PartKind, PartMesh};
use tracing::debug;
use uuid::Uuid;

/// Trays may exceed the interior by this much before the fit fails.
pub const FIT_SLACK: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxWalls {
    pub wall_thickness: f64,
    pub floor_thickness: f64,
    pub tolerance: f64,
}

/// One tray in the packing frame: origin at the packed footprint's corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraySpatial {
    pub tray_id: Uuid,
    pub name: String,
    /// Mesh extents: width, depth, height.
    pub dimensions: [f64; 3],
    pub position: [f64; 2],
    pub bounds_x: [f64; 2],
    pub bounds_y: [f64; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitCheck {
    pub interior_width: f64,
    pub interior_depth: f64,
    pub interior_height: f64,
    pub packed_width: f64,
    pub packed_depth: f64,
    pub max_tray_height: f64,
    pub width_gap: f64,
    pub depth_gap: f64,
    pub height_clearance: f64,
    pub fits_width: bool,
    pub fits_depth: bool,
    pub fits_height: bool,
}

impl FitCheck {
    pub fn fits(&self) -> bool {
        self.fits_width && self.fits_depth && self.fits_height
    }

    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !self.fits_width {
            issues.push(format!(
                "trays too wide: {:.1}mm > interior {:.1}mm",
                self.packed_width, self.interior_width
            ));
        }
        if !self.fits_depth {
            issues.push(format!(
                "trays too deep: {:.1}mm > interior {:.1}mm",
                self.packed_depth, self.interior_depth
            ));
        }
        if !self.fits_height {
            issues.push(format!(
                "trays too tall: {:.1}mm > interior {:.1}mm",
                self.max_tray_height, self.interior_height
            ));
        }
        issues
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialLayout {
    pub box_params: BoxWalls,
    pub box_exterior: Option<[f64; 3]>,
    pub box_interior: Option<[f64; 3]>,
    /// Sorted front to back, then left to right.
    pub trays: Vec<TraySpatial>,
    /// Absent when no box mesh was supplied.
    pub fit_check: Option<FitCheck>,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn spatial_layout(layout: &BoxLayout, parts: &[PartMesh]) -> SpatialLayout {
    let dims = &layout.dimensions;
    let walls = BoxWalls {
        wall_thickness: dims.wall_thickness,
        floor_thickness: dims.floor_thickness,
        tolerance: dims.tolerance,
    };

    let box_exterior = parts
        .iter()
        .find(|p| p.kind == PartKind::Box)
        .and_then(|p| p.mesh.bounding_box())
        .map(|b| b.size());
    let box_interior = box_exterior.map(|[w, d, h]| {
        [
            w - 2.0 * walls.wall_thickness,
            d - 2.0 * walls.wall_thickness,
            h - walls.floor_thickness,
        ]
    });

    let mut trays: Vec<TraySpatial> = parts
        .iter()
        .filter(|p| p.kind == PartKind::Tray)
        .filter_map(|p| {
            let size = p.mesh.bounding_box()?.size();
            let placement = layout.arrangement.placement(p.id)?;
            Some(TraySpatial {
                tray_id: p.id,
                name: p.name.clone(),
                dimensions: size,
                position: [placement.x, placement.y],
                bounds_x: [placement.x, placement.x + size[0]],
                bounds_y: [placement.y, placement.y + size[1]],
            })
        })
        .collect();
    trays.sort_by(|a, b| {
        a.position[1]
            .total_cmp(&b.position[1])
            .then(a.position[0].total_cmp(&b.position[0]))
    });

    let fit_check = box_interior.map(|[iw, id, ih]| {
        let packed_width = trays.iter().map(|t| t.bounds_x[1]).fold(0.0, f64::max);
        let packed_depth = trays.iter().map(|t| t.bounds_y[1]).fold(0.0, f64::max);
        let max_tray_height = trays.iter().map(|t| t.dimensions[2]).fold(0.0, f64::max);
        FitCheck {
            interior_width: iw,
            interior_depth: id,
            interior_height: ih,
            packed_width,
            packed_depth,
            max_tray_height,
            width_gap: round2(iw - packed_width),
            depth_gap: round2(id - packed_depth),
            height_clearance: round2(ih - max_tray_height),
            fits_width: iw >= packed_width - FIT_SLACK,
            fits_depth: id >= packed_depth - FIT_SLACK,
            fits_height: ih >= max_tray_height - FIT_SLACK,
        }
    });
    if let Some(fit) = &fit_check {
        debug!(
            width_gap = fit.width_gap,
            depth_gap = fit.depth_gap,
            height_clearance = fit.height_clearance,
            "fit check"
        );
    }

    SpatialLayout {
        box_params: walls,
        box_exterior,
        box_interior,
        trays,
        fit_check,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaps_round_to_hundredths() {
        assert_eq!(round2(1.004999), 1.0);
        assert_eq!(round2(0.456), 0.46);
        assert_eq!(round2(-0.004), -0.0);
    }

    #[test]
    fn fit_issues_name_each_failing_axis() {
        let fit = FitCheck {
            interior_width: 50.0,
            interior_depth: 40.0,
            interior_height: 20.0,
            packed_width: 60.0,
            packed_depth: 40.05,
            max_tray_height: 25.0,
            width_gap: -10.0,
            depth_gap: -0.05,
            height_clearance: -5.0,
            fits_width: false,
            fits_depth: true,
            fits_height: false,
        };
        assert!(!fit.fits());
        assert_eq!(
            fit.issues(),
            vec![
                "trays too wide: 60.0mm > interior 50.0mm",
                "trays too tall: 25.0mm > interior 20.0mm",
            ]
        );
    }
}
