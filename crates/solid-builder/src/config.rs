use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// Tessellation and detailing knobs that do not change the layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildConfig {
    /// Segments used for every circle: pockets, cutouts, holes, detents.
    pub circle_segments: u32,
    /// Depth of recessed name text.
    pub text_depth: f64,
    /// Clear border between text and the face edge.
    pub text_margin: f64,
    /// Cap on the glyph height, whatever room the face leaves.
    pub max_text_height: f64,
    /// How far cutters extend past the faces they open, so booleans never
    /// leave coplanar skins.
    pub cutter_overshoot: f64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            circle_segments: 32,
            text_depth: 0.6,
            text_margin: 4.0,
            max_text_height: 10.0,
            cutter_overshoot: 1.0,
        }
    }
}

impl BuildConfig {
    /// Coarse circles for fast interactive regeneration.
    pub fn preview() -> Self {
        Self {
            circle_segments: 16,
            ..Self::default()
        }
    }

    /// Smooth circles for printable output.
    pub fn export() -> Self {
        Self {
            circle_segments: 48,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        let config: Self = serde_json::from_str(json).map_err(|e| BuildError::Config {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BuildError> {
        let bad = |reason: String| Err(BuildError::Config { reason });
        if self.circle_segments < 3 {
            return bad(format!(
                "circle segments must be at least 3, got {}",
                self.circle_segments
            ));
        }
        for (name, value) in [
            ("text depth", self.text_depth),
            ("text margin", self.text_margin),
            ("max text height", self.max_text_height),
            ("cutter overshoot", self.cutter_overshoot),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return bad(format!("{name} must not be negative, got {value}"));
            }
        }
        if self.cutter_overshoot <= 0.0 {
            return bad("cutter overshoot must be positive".to_string());
        }
        Ok(())
    }
}
