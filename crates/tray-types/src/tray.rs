use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shape::CustomShape;
use crate::stack::{EdgeLoadedStack, TopLoadedStack};

/// Parameters of a single tray. All lengths in millimeters.
///
/// Replaced wholesale by the editing layer; nothing in the engine mutates it
/// except the explicit shape-reference migration in [`crate::migrate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrayParams {
    pub square_width: f64,
    /// Flat-to-flat size of the built-in hex.
    pub hex_width: f64,
    pub hex_pointy_top: bool,
    pub circle_diameter: f64,
    pub triangle_side: f64,
    pub counter_thickness: f64,

    pub clearance: f64,
    pub wall_thickness: f64,
    pub floor_thickness: f64,
    pub rim_height: f64,
    pub cutout_ratio: f64,
    pub cutout_max: f64,

    /// Manual width. `None` or zero means "use the packed width".
    pub tray_width_override: Option<f64>,
    pub extra_cols: u32,
    pub extra_rows: u32,
    pub show_name: bool,

    pub top_loaded_stacks: Vec<TopLoadedStack>,
    pub edge_loaded_stacks: Vec<EdgeLoadedStack>,
    pub custom_shapes: Vec<CustomShape>,
}

impl Default for TrayParams {
    fn default() -> Self {
        Self {
            square_width: 16.0,
            hex_width: 16.0,
            hex_pointy_top: false,
            circle_diameter: 16.0,
            triangle_side: 16.0,
            counter_thickness: 1.3,
            clearance: 0.5,
            wall_thickness: 2.0,
            floor_thickness: 1.5,
            rim_height: 2.0,
            cutout_ratio: 0.3,
            cutout_max: 12.0,
            tray_width_override: None,
            extra_cols: 0,
            extra_rows: 0,
            show_name: true,
            top_loaded_stacks: Vec::new(),
            edge_loaded_stacks: Vec::new(),
            custom_shapes: Vec::new(),
        }
    }
}

impl TrayParams {
    pub fn custom_shape(&self, name: &str) -> Option<&CustomShape> {
        self.custom_shapes.iter().find(|shape| shape.name == name)
    }

    /// Total number of stacks of either kind.
    pub fn stack_count(&self) -> usize {
        self.top_loaded_stacks.len() + self.edge_loaded_stacks.len()
    }

    /// The override width, if one is set and non-zero.
    pub fn width_override(&self) -> Option<f64> {
        self.tray_width_override.filter(|w| *w > 0.0)
    }
}

/// A tray entity owned by a box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tray {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub params: TrayParams,
}

impl Tray {
    pub fn new(name: impl Into<String>, params: TrayParams) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            params,
        }
    }
}
