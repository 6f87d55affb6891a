//! Glyph strokes from a Hershey sans-serif font.
//!
//! Hershey coordinates are small integers relative to the glyph center with
//! y growing downward. Strokes here are flipped to y-up, shifted so the
//! glyph's left bearing sits at `x = 0` and the baseline at `y = 0`.

use hershey::Vector;

/// Font row of the baseline, in Hershey units.
const BASELINE: f64 = 9.0;
/// Height of capitals and digits above the baseline, in font units.
pub const CAP_HEIGHT: f64 = 21.0;
/// Stroke width, in font units.
pub const STROKE: f64 = 3.0;
/// Advance for characters the font has no glyph for.
pub const MISSING_ADVANCE: f64 = 16.0;

pub type Segment = [[f64; 2]; 2];

#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Distance to the next glyph's origin.
    pub advance: f64,
    pub segments: Vec<Segment>,
}

/// Strokes of `c`, or `None` when the font has no glyph for it.
pub fn glyph(c: char) -> Option<Glyph> {
    let font = hershey::fonts::GOTHIC_ENG_SANS;
    let g = font.glyph(c).ok()?;
    let left = g.min_x as f64;
    let map = |x: f64, y: f64| [x - left, BASELINE - y];

    let mut segments = Vec::new();
    let mut pen: Option<[f64; 2]> = None;
    for v in &g.vectors {
        match v {
            Vector::MoveTo { x, y } => pen = Some(map(*x as f64, *y as f64)),
            Vector::LineTo { x, y } => {
                let to = map(*x as f64, *y as f64);
                if let Some(from) = pen {
                    segments.push([from, to]);
                }
                pen = Some(to);
            }
        }
    }
    Some(Glyph {
        advance: (g.max_x - g.min_x) as f64,
        segments,
    })
}
