use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lid::LidParams;
use crate::tray::Tray;

/// Parameters of a storage box, including its trays in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoxParams {
    pub id: Uuid,
    pub name: String,
    pub tolerance: f64,
    pub wall_thickness: f64,
    pub floor_thickness: f64,
    pub lid: LidParams,
    pub custom_width: Option<f64>,
    pub custom_depth: Option<f64>,
    pub custom_height: Option<f64>,
    /// Fill space past the packed trays with solid material instead of a
    /// thin retaining wall.
    pub fill_solid_empty: bool,
    /// Diameter of the push-out holes in the floor. Zero disables them.
    pub poke_hole_diameter: f64,
    pub trays: Vec<Tray>,
}

impl Default for BoxParams {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            tolerance: 0.5,
            wall_thickness: 3.0,
            floor_thickness: 2.0,
            lid: LidParams::default(),
            custom_width: None,
            custom_depth: None,
            custom_height: None,
            fill_solid_empty: false,
            poke_hole_diameter: 10.0,
            trays: Vec::new(),
        }
    }
}

impl BoxParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_tray(mut self, tray: Tray) -> Self {
        self.trays.push(tray);
        self
    }

    pub fn tray(&self, id: Uuid) -> Option<&Tray> {
        self.trays.iter().find(|tray| tray.id == id)
    }

    pub fn tray_mut(&mut self, id: Uuid) -> Option<&mut Tray> {
        self.trays.iter_mut().find(|tray| tray.id == id)
    }

    /// Custom dimensions that are set and positive, in (width, depth, height) order.
    pub fn custom_dimensions(&self) -> [Option<f64>; 3] {
        [self.custom_width, self.custom_depth, self.custom_height].map(|d| d.filter(|v| *v > 0.0))
    }
}
