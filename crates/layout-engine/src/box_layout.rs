//! Whole-box layout: every tray planned, arranged and measured.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use tray_types::BoxParams;
use uuid::Uuid;

use crate::box_dims::{box_dimensions, gap_fills, BoxDimensions, GapFills};
use crate::error::{subject_name, Result};
use crate::tray_arrange::{arrange_trays, Arrangement, TrayFootprint, TrayPlacement};
use crate::tray_dims::{compute_tray_layout, TrayLayout};
use crate::validate::{validate_box_params, validate_lid_fit};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxLayout {
    pub box_id: Uuid,
    pub name: String,
    /// Per-tray layouts at the shared target height, in box order.
    pub trays: Vec<TrayLayout>,
    pub arrangement: Arrangement,
    pub dimensions: BoxDimensions,
    pub gap_fills: GapFills,
    pub target_height: f64,
}

/// A tray together with its placement and absolute origin in box space.
#[derive(Debug, Clone, Copy)]
pub struct PlacedTray<'a> {
    pub layout: &'a TrayLayout,
    pub placement: &'a TrayPlacement,
    pub origin: [f64; 3],
}

impl PlacedTray<'_> {
    /// Tray footprint center in box space.
    pub fn center(&self) -> [f64; 2] {
        [
            self.origin[0] + self.placement.width / 2.0,
            self.origin[1] + self.placement.depth / 2.0,
        ]
    }
}

impl BoxLayout {
    pub fn tray(&self, tray_id: Uuid) -> Option<&TrayLayout> {
        self.trays.iter().find(|t| t.tray_id == tray_id)
    }

    /// Absolute position of a tray's minimum corner inside the box.
    pub fn tray_origin(&self, tray_id: Uuid) -> Option<[f64; 3]> {
        self.arrangement
            .placement(tray_id)
            .map(|p| self.origin_of(p))
    }

    pub fn placed_trays(&self) -> impl Iterator<Item = PlacedTray<'_>> {
        self.trays.iter().zip(&self.arrangement.placements).map(|(layout, placement)| {
            PlacedTray {
                layout,
                placement,
                origin: self.origin_of(placement),
            }
        })
    }

    fn origin_of(&self, p: &TrayPlacement) -> [f64; 3] {
        let inset = self.dimensions.wall_thickness + self.dimensions.tolerance;
        [inset + p.x, inset + p.y, self.dimensions.floor_thickness]
    }
}

/// Plan every tray, raise them to a shared height, arrange them and size the
/// box. Custom dimensions below the minimum are reported in
/// [`BoxDimensions::shortfalls`], not rejected here.
#[instrument(skip(params), fields(name = %params.name, trays = params.trays.len()))]
pub fn compute_box_layout(params: &BoxParams) -> Result<BoxLayout> {
    let subject = subject_name("box", &params.name);
    validate_box_params(params, &subject)?;

    let mut base_height: f64 = 0.0;
    for tray in &params.trays {
        let layout = compute_tray_layout(tray, None)?;
        base_height = base_height.max(layout.dimensions.base_height);
    }
    let target_height = match params.custom_height {
        Some(h) if h > 0.0 => base_height.max(h - params.floor_thickness - params.tolerance),
        _ => base_height,
    };

    let trays = params
        .trays
        .iter()
        .map(|t| compute_tray_layout(t, Some(target_height)))
        .collect::<Result<Vec<_>>>()?;
    let footprints: Vec<TrayFootprint> = trays
        .iter()
        .map(|t| TrayFootprint {
            tray_id: t.tray_id,
            width: t.dimensions.width,
            depth: t.dimensions.depth,
            height: t.dimensions.height,
        })
        .collect();
    let max_row_width = params
        .custom_width
        .filter(|w| *w > 0.0)
        .map(|w| w - 2.0 * params.wall_thickness - 2.0 * params.tolerance);
    let arrangement = arrange_trays(&footprints, max_row_width);
    let dimensions = box_dimensions(params, &arrangement);
    validate_lid_fit(&params.lid, dimensions.height, params.floor_thickness, &subject)?;
    let gap_fills = gap_fills(params, &dimensions);

    info!(
        width = dimensions.width,
        depth = dimensions.depth,
        height = dimensions.height,
        rows = arrangement.row_count,
        "box layout computed"
    );
    Ok(BoxLayout {
        box_id: params.id,
        name: params.name.clone(),
        trays,
        arrangement,
        dimensions,
        gap_fills,
        target_height,
    })
}
