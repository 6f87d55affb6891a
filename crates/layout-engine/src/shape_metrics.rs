//! Pocket footprints and standing heights for counter shapes.

use serde::{Deserialize, Serialize};
use tray_types::{BaseShape, BuiltinShape, CustomShape, ShapeRef, ShapeSpec, TrayParams};

use crate::error::{require_non_negative, require_positive, LayoutError, Result};

/// cos(30°): ratio of a hexagon's flat-to-flat to point-to-point size.
pub const HEX_FLAT_TO_POINT: f64 = 0.866_025_403_784_438_6;

/// Outline family used when cutting a top-loaded pocket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PocketOutline {
    Rectangle { corner_radius: f64 },
    Hex { pointy_top: bool },
    Circle,
    Triangle,
}

/// Resolve a stack's shape reference against the tray's globals and custom
/// shape table, validating the resulting sizes.
pub fn resolve_shape(params: &TrayParams, shape: &ShapeRef, subject: &str) -> Result<ShapeSpec> {
    let spec = match shape {
        ShapeRef::Builtin(BuiltinShape::Square) => ShapeSpec::Square {
            width: params.square_width,
        },
        ShapeRef::Builtin(BuiltinShape::Hex) => ShapeSpec::Hex {
            flat_to_flat: params.hex_width,
            pointy_top: params.hex_pointy_top,
        },
        ShapeRef::Builtin(BuiltinShape::Circle) => ShapeSpec::Circle {
            diameter: params.circle_diameter,
        },
        ShapeRef::Builtin(BuiltinShape::Triangle) => ShapeSpec::Triangle {
            side: params.triangle_side,
        },
        ShapeRef::Custom(name) => {
            let custom = params
                .custom_shape(name)
                .ok_or_else(|| LayoutError::ShapeNotFound {
                    subject: subject.to_string(),
                    shape: name.clone(),
                })?;
            validate_custom(custom, subject)?;
            ShapeSpec::Custom(custom.clone())
        }
    };
    let (w, l) = raw_footprint(&spec, params.hex_pointy_top);
    if !(w.is_finite() && l.is_finite() && w > 0.0 && l > 0.0) {
        return Err(LayoutError::invalid(
            subject,
            format!("shape '{}' has zero size", spec.display_name()),
        ));
    }
    Ok(spec)
}

fn validate_custom(custom: &CustomShape, subject: &str) -> Result<()> {
    let field = |f: &str| format!("shape '{}' {f}", custom.name);
    require_positive(subject, &field("width"), custom.width)?;
    if let Some(length) = custom.length {
        require_positive(subject, &field("length"), length)?;
    }
    if let Some(thickness) = custom.thickness {
        require_positive(subject, &field("thickness"), thickness)?;
    }
    if let Some(radius) = custom.corner_radius {
        require_non_negative(subject, &field("corner radius"), radius)?;
    }
    Ok(())
}

/// Unpadded footprint `(x, y)` of a shape lying flat in its natural
/// orientation.
pub fn raw_footprint(spec: &ShapeSpec, global_pointy_top: bool) -> (f64, f64) {
    match spec {
        ShapeSpec::Square { width } => (*width, *width),
        ShapeSpec::Circle { diameter } => (*diameter, *diameter),
        ShapeSpec::Triangle { side } => (*side, side * HEX_FLAT_TO_POINT),
        ShapeSpec::Hex {
            flat_to_flat,
            pointy_top,
        } => hex_footprint(*flat_to_flat, *pointy_top),
        ShapeSpec::Custom(custom) => match custom.base_shape {
            BaseShape::Rectangle => {
                let length = custom.length.unwrap_or(custom.width);
                (custom.width.max(length), custom.width.min(length))
            }
            BaseShape::Square | BaseShape::Circle => (custom.width, custom.width),
            BaseShape::Triangle => (custom.width, custom.width * HEX_FLAT_TO_POINT),
            BaseShape::Hex => {
                hex_footprint(custom.width, custom.pointy_top.unwrap_or(global_pointy_top))
            }
        },
    }
}

fn hex_footprint(flat_to_flat: f64, pointy_top: bool) -> (f64, f64) {
    let point_to_point = flat_to_flat / HEX_FLAT_TO_POINT;
    if pointy_top {
        (flat_to_flat, point_to_point)
    } else {
        (point_to_point, flat_to_flat)
    }
}

/// X size of a top-loaded pocket.
pub fn pocket_width(spec: &ShapeSpec, clearance: f64, global_pointy_top: bool) -> f64 {
    raw_footprint(spec, global_pointy_top).0 + clearance
}

/// Y size of a top-loaded pocket.
pub fn pocket_length(spec: &ShapeSpec, clearance: f64, global_pointy_top: bool) -> f64 {
    raw_footprint(spec, global_pointy_top).1 + clearance
}

/// Height of a counter stood on edge: it rests on its longer side.
pub fn standing_height(spec: &ShapeSpec, global_pointy_top: bool) -> f64 {
    let (w, l) = raw_footprint(spec, global_pointy_top);
    w.min(l)
}

/// Horizontal extent of a counter stood on edge.
pub fn edge_long_side(spec: &ShapeSpec, global_pointy_top: bool) -> f64 {
    let (w, l) = raw_footprint(spec, global_pointy_top);
    w.max(l)
}

/// Per-counter thickness, honoring a custom shape's own value.
pub fn counter_thickness(spec: &ShapeSpec, global: f64) -> f64 {
    match spec {
        ShapeSpec::Custom(CustomShape {
            thickness: Some(t), ..
        }) => *t,
        _ => global,
    }
}

/// Which outline a top-loaded pocket for this shape is cut with.
pub fn pocket_outline(spec: &ShapeSpec, global_pointy_top: bool) -> PocketOutline {
    match spec {
        ShapeSpec::Square { .. } => PocketOutline::Rectangle { corner_radius: 0.0 },
        ShapeSpec::Hex { pointy_top, .. } => PocketOutline::Hex {
            pointy_top: *pointy_top,
        },
        ShapeSpec::Circle { .. } => PocketOutline::Circle,
        ShapeSpec::Triangle { .. } => PocketOutline::Triangle,
        ShapeSpec::Custom(custom) => match custom.base_shape {
            BaseShape::Rectangle | BaseShape::Square => PocketOutline::Rectangle {
                corner_radius: custom.corner_radius.unwrap_or(0.0),
            },
            BaseShape::Circle => PocketOutline::Circle,
            BaseShape::Triangle => PocketOutline::Triangle,
            BaseShape::Hex => PocketOutline::Hex {
                pointy_top: custom.pointy_top.unwrap_or(global_pointy_top),
            },
        },
    }
}

/// All metrics of one shape under one tray's parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeMetrics {
    pub pocket_width: f64,
    pub pocket_length: f64,
    pub standing_height: f64,
    pub long_side: f64,
    pub thickness: f64,
}

impl ShapeMetrics {
    pub fn of(spec: &ShapeSpec, params: &TrayParams) -> Self {
        let pointy = params.hex_pointy_top;
        Self {
            pocket_width: pocket_width(spec, params.clearance, pointy),
            pocket_length: pocket_length(spec, params.clearance, pointy),
            standing_height: standing_height(spec, pointy),
            long_side: edge_long_side(spec, pointy),
            thickness: counter_thickness(spec, params.counter_thickness),
        }
    }
}
