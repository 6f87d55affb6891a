use serde::{Deserialize, Serialize};

use crate::shape::ShapeRef;

/// Counters stacked flat and lifted straight up out of a vertical pocket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopLoadedStack {
    pub shape: ShapeRef,
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl TopLoadedStack {
    pub fn new(shape: impl Into<ShapeRef>, count: u32) -> Self {
        Self {
            shape: shape.into(),
            count,
            label: None,
        }
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Which way an edge-loaded stack runs relative to the tray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeOrientation {
    /// Stacking axis parallel to the tray width (X).
    Lengthwise,
    /// Stacking axis parallel to the tray depth (Y).
    Crosswise,
}

/// Counters stood on edge like books and lifted sideways out of a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeLoadedStack {
    pub shape: ShapeRef,
    pub count: u32,
    pub orientation: EdgeOrientation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl EdgeLoadedStack {
    pub fn lengthwise(shape: impl Into<ShapeRef>, count: u32) -> Self {
        Self {
            shape: shape.into(),
            count,
            orientation: EdgeOrientation::Lengthwise,
            label: None,
        }
    }

    pub fn crosswise(shape: impl Into<ShapeRef>, count: u32) -> Self {
        Self {
            shape: shape.into(),
            count,
            orientation: EdgeOrientation::Crosswise,
            label: None,
        }
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
