//! Box exterior dimensions and custom-size gap fills.

use serde::{Deserialize, Serialize};
use tracing::debug;
use tray_types::BoxParams;

use crate::error::{Dimension, LayoutError, Result};
use crate::tray_arrange::Arrangement;

/// Gaps thinner than this are treated as flush.
const MIN_GAP: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxDimensions {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
    pub min_width: f64,
    pub min_depth: f64,
    pub min_height: f64,
    pub wall_thickness: f64,
    pub floor_thickness: f64,
    pub tolerance: f64,
    pub packed_width: f64,
    pub packed_depth: f64,
    pub tray_height: f64,
}

/// A requested exterior dimension below the packed minimum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionShortfall {
    pub dimension: Dimension,
    pub requested: f64,
    pub minimum: f64,
}

impl BoxDimensions {
    pub fn interior_width(&self) -> f64 {
        self.width - 2.0 * self.wall_thickness
    }

    pub fn interior_depth(&self) -> f64 {
        self.depth - 2.0 * self.wall_thickness
    }

    pub fn interior_height(&self) -> f64 {
        self.height - self.floor_thickness
    }

    /// Free space left inside the walls around the packed trays, per axis.
    pub fn fit_gaps(&self) -> [f64; 3] {
        [
            self.interior_width() - self.packed_width,
            self.interior_depth() - self.packed_depth,
            self.interior_height() - self.tray_height,
        ]
    }

    pub fn shortfalls(&self) -> Vec<DimensionShortfall> {
        [
            (Dimension::Width, self.width, self.min_width),
            (Dimension::Depth, self.depth, self.min_depth),
            (Dimension::Height, self.height, self.min_height),
        ]
        .into_iter()
        .filter(|&(_, requested, minimum)| requested < minimum - 1e-9)
        .map(|(dimension, requested, minimum)| DimensionShortfall {
            dimension,
            requested,
            minimum,
        })
        .collect()
    }

    /// Fail with the first dimension that cannot hold the packed trays.
    pub fn check(&self, subject: &str) -> Result<()> {
        match self.shortfalls().first() {
            Some(s) => Err(LayoutError::DimensionConflict {
                subject: subject.to_string(),
                dimension: s.dimension,
                requested: s.requested,
                minimum: s.minimum,
            }),
            None => Ok(()),
        }
    }
}

/// Minimum exterior from the packed footprint, replaced per axis by any
/// custom dimension. Custom values below the minimum are kept as given.
pub fn box_dimensions(params: &BoxParams, arrangement: &Arrangement) -> BoxDimensions {
    let wall = params.wall_thickness;
    let tol = params.tolerance;
    let tray_height = arrangement.max_height();
    let min_width = arrangement.packed_width + 2.0 * tol + 2.0 * wall;
    let min_depth = arrangement.packed_depth + 2.0 * tol + 2.0 * wall;
    let min_height = params.floor_thickness + tray_height + tol;
    let [cw, cd, ch] = params.custom_dimensions();
    BoxDimensions {
        width: cw.unwrap_or(min_width),
        depth: cd.unwrap_or(min_depth),
        height: ch.unwrap_or(min_height),
        min_width,
        min_depth,
        min_height,
        wall_thickness: wall,
        floor_thickness: params.floor_thickness,
        tolerance: tol,
        packed_width: arrangement.packed_width,
        packed_depth: arrangement.packed_depth,
        tray_height,
    }
}

/// Axis-aligned region in box coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillRegion {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl FillRegion {
    pub fn size(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn volume(&self) -> f64 {
        let [x, y, z] = self.size();
        x * y * z
    }
}

/// Treatment of the space between the packed trays and a larger custom
/// exterior. East is +X past the packed width, north is +Y past the packed
/// depth.
///
/// With `fill_solid_empty` the gaps stay solid and are reported as fills.
/// Otherwise the gap is hollowed out and a retaining wall is left against the
/// trays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapFills {
    pub east_fill: Option<FillRegion>,
    pub north_fill: Option<FillRegion>,
    pub east_gap: Option<FillRegion>,
    pub north_gap: Option<FillRegion>,
    pub east_wall: Option<FillRegion>,
    pub north_wall: Option<FillRegion>,
}

impl GapFills {
    pub fn fill_volume(&self) -> f64 {
        [self.east_fill, self.north_fill]
            .iter()
            .flatten()
            .map(FillRegion::volume)
            .sum()
    }

    pub fn wall_volume(&self) -> f64 {
        [self.east_wall, self.north_wall]
            .iter()
            .flatten()
            .map(FillRegion::volume)
            .sum()
    }

    pub fn hollowed(&self) -> impl Iterator<Item = &FillRegion> {
        self.east_gap.iter().chain(self.north_gap.iter())
    }

    pub fn walls(&self) -> impl Iterator<Item = &FillRegion> {
        self.east_wall.iter().chain(self.north_wall.iter())
    }
}

pub fn gap_fills(params: &BoxParams, dims: &BoxDimensions) -> GapFills {
    let wall = dims.wall_thickness;
    let tol = dims.tolerance;
    let packed_end_x = wall + 2.0 * tol + dims.packed_width;
    let packed_end_y = wall + 2.0 * tol + dims.packed_depth;
    let inner_x = dims.width - wall;
    let inner_y = dims.depth - wall;
    let z0 = dims.floor_thickness;
    let z1 = dims.height;

    let east = (inner_x - packed_end_x >= MIN_GAP).then(|| FillRegion {
        min: [packed_end_x, wall, z0],
        max: [inner_x, inner_y, z1],
    });
    let north = (inner_y - packed_end_y >= MIN_GAP).then(|| FillRegion {
        min: [wall, packed_end_y, z0],
        max: [packed_end_x.min(inner_x), inner_y, z1],
    });

    let mut fills = GapFills::default();
    if params.fill_solid_empty {
        fills.east_fill = east;
        fills.north_fill = north;
    } else {
        fills.east_gap = east;
        fills.north_gap = north;
        fills.east_wall = east.map(|r| {
            let t = wall.min(r.size()[0]);
            FillRegion {
                min: r.min,
                max: [r.min[0] + t, r.max[1], r.max[2]],
            }
        });
        fills.north_wall = north.map(|r| {
            let t = wall.min(r.size()[1]);
            FillRegion {
                min: r.min,
                max: [r.max[0], r.min[1] + t, r.max[2]],
            }
        });
    }
    debug!(
        solid = params.fill_solid_empty,
        east = east.is_some(),
        north = north.is_some(),
        "gap fills"
    );
    fills
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use uuid::Uuid;

    use crate::tray_arrange::{arrange_trays, TrayFootprint};

    fn arrangement(width: f64, depth: f64, height: f64) -> Arrangement {
        arrange_trays(
            &[TrayFootprint {
                tray_id: Uuid::new_v4(),
                width,
                depth,
                height,
            }],
            None,
        )
    }

    #[test]
    fn minimum_adds_walls_and_tolerance() {
        let params = BoxParams::default();
        let dims = box_dimensions(&params, &arrangement(50.0, 40.0, 20.0));
        assert_relative_eq!(dims.min_width, 50.0 + 1.0 + 6.0);
        assert_relative_eq!(dims.min_depth, 40.0 + 1.0 + 6.0);
        assert_relative_eq!(dims.min_height, 2.0 + 20.0 + 0.5);
        assert_relative_eq!(dims.width, dims.min_width);
        let [gx, gy, gz] = dims.fit_gaps();
        assert_relative_eq!(gx, 1.0);
        assert_relative_eq!(gy, 1.0);
        assert_relative_eq!(gz, 0.5);
        assert!(dims.shortfalls().is_empty());
    }

    #[test]
    fn small_custom_width_reports_minimum() {
        let params = BoxParams {
            custom_width: Some(40.0),
            ..BoxParams::default()
        };
        let dims = box_dimensions(&params, &arrangement(50.0, 40.0, 20.0));
        assert_relative_eq!(dims.width, 40.0);
        let err = dims.check("box 'Game'").unwrap_err();
        assert_eq!(
            err,
            LayoutError::DimensionConflict {
                subject: "box 'Game'".into(),
                dimension: Dimension::Width,
                requested: 40.0,
                minimum: 57.0,
            }
        );
    }

    #[test]
    fn partition_wall_is_clamped_to_gap() {
        let params = BoxParams {
            custom_width: Some(59.0),
            ..BoxParams::default()
        };
        let dims = box_dimensions(&params, &arrangement(50.0, 40.0, 20.0));
        let fills = gap_fills(&params, &dims);
        let wall = fills.east_wall.unwrap();
        assert_relative_eq!(wall.size()[0], 2.0, epsilon = 1e-9);
        assert!(fills.north_gap.is_none());
        assert!(fills.east_fill.is_none());
    }
}
