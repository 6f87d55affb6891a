//! Shared geometry of the sliding lid seat.
//!
//! The lid slides on along +Y from the front (`y = 0`). On the left, right
//! and back the outer band of the wall, `rail_inset` wide, is lowered by
//! `ledge_height`; the lid's lip rests there and its rails run in grooves cut
//! into the raised inner part of the wall.

use layout_engine::BoxDimensions;
use tray_types::LidParams;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeatGeometry {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
    pub wall: f64,
    /// Outer band width.
    pub inset: f64,
    pub clearance: f64,
    pub groove_depth: f64,
    pub groove_height: f64,
    /// Box Z of the lowered band, where the lid's underside rests.
    pub seat_z: f64,
    pub ledge: f64,
}

impl SeatGeometry {
    pub fn new(dims: &BoxDimensions, lid: &LidParams) -> Self {
        Self {
            width: dims.width,
            depth: dims.depth,
            height: dims.height,
            wall: dims.wall_thickness,
            inset: lid.rail_inset,
            clearance: lid.clearance,
            groove_depth: lid.groove_depth(),
            groove_height: lid.groove_height(),
            seat_z: dims.height - lid.ledge_height,
            ledge: lid.ledge_height,
        }
    }

    /// Left groove cross-section in (x, z), box frame.
    pub fn groove_profile(&self) -> [[f64; 2]; 4] {
        let (s, gd) = (self.inset, self.groove_depth);
        let (z0, zt) = (self.seat_z, self.seat_z + self.groove_height);
        [[s, z0], [s + gd, z0], [s + gd, zt], [s, zt]]
    }

    /// 45° fill in the inner top corner of the left groove, in (x, z).
    pub fn chamfer_profile(&self) -> [[f64; 2]; 3] {
        let (s, gd) = (self.inset, self.groove_depth);
        let zt = self.seat_z + self.groove_height;
        [[s + gd, zt - gd], [s + gd, zt], [s, zt]]
    }

    /// Left rail cross-section in (x, z), lid frame (`z = 0` at the seat).
    /// It is the chamfered groove shrunk by the clearance on the tip, top
    /// and chamfer.
    pub fn rail_profile(&self, rail_height: f64) -> [[f64; 2]; 4] {
        let (s, c, gd) = (self.inset, self.clearance, self.groove_depth);
        let zt = self.groove_height;
        [
            [s - c, 0.0],
            [s + rail_height, 0.0],
            [s + rail_height, zt - gd - c],
            [s - c, zt - c],
        ]
    }

    /// Mirror an x coordinate onto the right side.
    pub fn mirror_x(&self, x: f64) -> f64 {
        self.width - x
    }

    /// Map a left-side distance from the outer face onto the back side (y).
    pub fn to_back(&self, x: f64) -> f64 {
        self.depth - x
    }

    /// End of the side grooves and rails along Y, leaving room for the back
    /// groove.
    pub fn side_run_end(&self) -> f64 {
        self.depth - self.inset - self.groove_depth
    }
}

/// Mirror a left-side (x, z) profile onto the right side.
pub fn mirrored<const N: usize>(seat: &SeatGeometry, profile: [[f64; 2]; N]) -> [[f64; 2]; N] {
    profile.map(|[x, z]| [seat.mirror_x(x), z])
}

/// Map a left-side (x, z) profile onto the back side as (y, z).
pub fn to_back<const N: usize>(seat: &SeatGeometry, profile: [[f64; 2]; N]) -> [[f64; 2]; N] {
    profile.map(|[x, z]| [seat.to_back(x), z])
}
