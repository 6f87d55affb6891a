use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Built-in counter shapes sized by the tray's global shape parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinShape {
    Square,
    Hex,
    Circle,
    Triangle,
}

impl BuiltinShape {
    pub const ALL: [BuiltinShape; 4] = [
        BuiltinShape::Square,
        BuiltinShape::Hex,
        BuiltinShape::Circle,
        BuiltinShape::Triangle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinShape::Square => "square",
            BuiltinShape::Hex => "hex",
            BuiltinShape::Circle => "circle",
            BuiltinShape::Triangle => "triangle",
        }
    }
}

/// Outline family of a user-defined shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseShape {
    Rectangle,
    Square,
    Circle,
    Hex,
    Triangle,
}

/// A user-defined counter shape, stored in a tray's custom-shape table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomShape {
    pub name: String,
    pub base_shape: BaseShape,
    /// Primary size in mm. Flat-to-flat for hexes, side length for triangles.
    pub width: f64,
    /// Second side for rectangles. Defaults to `width`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    /// Per-shape hex orientation. Falls back to the tray's global setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointy_top: Option<bool>,
    /// Per-shape counter thickness. Falls back to the tray's global thickness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
}

impl CustomShape {
    pub fn rectangle(name: impl Into<String>, width: f64, length: f64) -> Self {
        Self {
            name: name.into(),
            base_shape: BaseShape::Rectangle,
            width,
            length: Some(length),
            corner_radius: None,
            pointy_top: None,
            thickness: None,
        }
    }

    pub fn with_base(name: impl Into<String>, base_shape: BaseShape, width: f64) -> Self {
        Self {
            name: name.into(),
            base_shape,
            width,
            length: None,
            corner_radius: None,
            pointy_top: None,
            thickness: None,
        }
    }
}

/// Reference from a stack to a shape.
///
/// Serialized as a plain string: `"square"`, `"hex"`, `"circle"`,
/// `"triangle"` or `"custom:<name>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ShapeRef {
    Builtin(BuiltinShape),
    Custom(String),
}

impl ShapeRef {
    pub fn custom(name: impl Into<String>) -> Self {
        ShapeRef::Custom(name.into())
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ShapeRef::Custom(_))
    }
}

impl Default for ShapeRef {
    fn default() -> Self {
        ShapeRef::Builtin(BuiltinShape::Square)
    }
}

impl From<BuiltinShape> for ShapeRef {
    fn from(shape: BuiltinShape) -> Self {
        ShapeRef::Builtin(shape)
    }
}

impl fmt::Display for ShapeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeRef::Builtin(shape) => f.write_str(shape.as_str()),
            ShapeRef::Custom(name) => write!(f, "custom:{name}"),
        }
    }
}

/// Error parsing a serialized shape reference.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeRefParseError {
    #[error("unknown shape reference '{value}'")]
    Unknown { value: String },

    #[error("custom shape reference has an empty name")]
    EmptyCustomName,
}

impl FromStr for ShapeRef {
    type Err = ShapeRefParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(name) = s.strip_prefix("custom:") {
            if name.trim().is_empty() {
                return Err(ShapeRefParseError::EmptyCustomName);
            }
            return Ok(ShapeRef::Custom(name.to_string()));
        }
        BuiltinShape::ALL
            .iter()
            .find(|shape| shape.as_str().eq_ignore_ascii_case(s))
            .map(|shape| ShapeRef::Builtin(*shape))
            .ok_or_else(|| ShapeRefParseError::Unknown {
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for ShapeRef {
    type Error = ShapeRefParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShapeRef> for String {
    fn from(shape: ShapeRef) -> Self {
        shape.to_string()
    }
}

/// A shape reference resolved against a tray's parameters.
///
/// Built-in variants carry the sizes they take from the tray's globals, so
/// metrics can be computed without going back to `TrayParams`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ShapeSpec {
    Square { width: f64 },
    Hex { flat_to_flat: f64, pointy_top: bool },
    Circle { diameter: f64 },
    Triangle { side: f64 },
    Custom(CustomShape),
}

impl ShapeSpec {
    pub fn display_name(&self) -> String {
        match self {
            ShapeSpec::Square { .. } => "square".to_string(),
            ShapeSpec::Hex { .. } => "hex".to_string(),
            ShapeSpec::Circle { .. } => "circle".to_string(),
            ShapeSpec::Triangle { .. } => "triangle".to_string(),
            ShapeSpec::Custom(custom) => custom.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_builtin_and_custom_refs() {
        assert_eq!(
            "hex".parse::<ShapeRef>().unwrap(),
            ShapeRef::Builtin(BuiltinShape::Hex)
        );
        assert_eq!(
            "custom:Card".parse::<ShapeRef>().unwrap(),
            ShapeRef::custom("Card")
        );
        assert_eq!(
            "custom: ".parse::<ShapeRef>(),
            Err(ShapeRefParseError::EmptyCustomName)
        );
        assert!(matches!(
            "octagon".parse::<ShapeRef>(),
            Err(ShapeRefParseError::Unknown { .. })
        ));
    }

    #[test]
    fn display_matches_serialized_form() {
        assert_eq!(ShapeRef::custom("Big Tile").to_string(), "custom:Big Tile");
        assert_eq!(ShapeRef::from(BuiltinShape::Triangle).to_string(), "triangle");
    }
}
