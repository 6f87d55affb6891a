use serde::{Deserialize, Serialize};

/// Lid and snap-lock parameters. All lengths in millimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LidParams {
    /// Minimum thickness of the lid's top plate.
    pub thickness: f64,
    /// How far each rail protrudes from the lip into its groove.
    pub rail_height: f64,
    /// Width of the recessed band around the box top, which is also the
    /// lid lip width.
    pub rail_inset: f64,
    /// Depth of the lid seat recess and height of the lid lip.
    pub ledge_height: f64,
    /// Sliding clearance between lid and box features.
    pub clearance: f64,

    pub snap_enabled: bool,
    pub snap_bump_height: f64,
    pub snap_bump_width: f64,
    /// Groove height as a fraction of the ledge height.
    pub rail_engagement: f64,

    /// Ramp lock, used instead of the detent when snap-lock is disabled.
    pub ramp_lock_enabled: bool,
    pub ramp_height: f64,
    pub ramp_length: f64,

    pub show_name: bool,
}

impl Default for LidParams {
    fn default() -> Self {
        Self {
            thickness: 2.0,
            rail_height: 0.6,
            rail_inset: 1.2,
            ledge_height: 3.0,
            clearance: 0.2,
            snap_enabled: true,
            snap_bump_height: 0.4,
            snap_bump_width: 4.0,
            rail_engagement: 0.5,
            ramp_lock_enabled: false,
            ramp_height: 0.6,
            ramp_length: 2.5,
            show_name: true,
        }
    }
}

impl LidParams {
    /// Depth of the box grooves measured into the wall.
    pub fn groove_depth(&self) -> f64 {
        self.rail_height + self.clearance
    }

    /// Height of the box grooves.
    pub fn groove_height(&self) -> f64 {
        self.rail_engagement * self.ledge_height
    }
}
