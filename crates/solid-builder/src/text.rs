//! Name text as convex stroke quads, ready to extrude.

use csg_kernel::{Axis, Kernel, KernelError, SolidHandle};

use crate::font::{glyph, CAP_HEIGHT, MISSING_ADVANCE, STROKE};

/// Glyphs shorter than this would not survive printing.
pub const MIN_TEXT_HEIGHT: f64 = 2.0;

pub type Quad = [[f64; 2]; 4];

/// Stroke outlines of a text line in millimeters.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOutline {
    pub quads: Vec<Quad>,
}

impl TextOutline {
    /// Lay out `text` with capitals `cap_height` tall, starting at the origin.
    pub fn layout(text: &str, cap_height: f64) -> Self {
        let unit = cap_height / CAP_HEIGHT;
        let half = STROKE * unit / 2.0;
        let mut quads = Vec::new();
        let mut pen = 0.0;
        for c in text.chars().filter(|c| !c.is_control()) {
            let Some(g) = glyph(c) else {
                pen += MISSING_ADVANCE * unit;
                continue;
            };
            for [p, q] in &g.segments {
                let p = [pen + p[0] * unit, p[1] * unit];
                let q = [pen + q[0] * unit, q[1] * unit];
                quads.push(stroke_quad(p, q, half));
            }
            pen += g.advance * unit;
        }
        Self { quads }
    }

    /// Lay out `text` centered on the origin, as large as possible up to
    /// `max_height` while fitting in `max_width × max_box_height`. `None`
    /// when the text is blank or would be too small to print.
    pub fn fit(text: &str, max_width: f64, max_box_height: f64, max_height: f64) -> Option<Self> {
        if text.trim().is_empty() || max_width <= 0.0 || max_box_height <= 0.0 {
            return None;
        }
        let nominal = Self::layout(text.trim(), max_height);
        let (min, max) = nominal.bounds()?;
        let (w, h) = (max[0] - min[0], max[1] - min[1]);
        let scale = (max_width / w).min(max_box_height / h).min(1.0);
        if max_height * scale < MIN_TEXT_HEIGHT {
            return None;
        }
        let center = [(min[0] + max[0]) / 2.0, (min[1] + max[1]) / 2.0];
        Some(nominal.map_points(|p| [(p[0] - center[0]) * scale, (p[1] - center[1]) * scale]))
    }

    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let mut points = self.quads.iter().flatten();
        let first = *points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| {
            (
                [lo[0].min(p[0]), lo[1].min(p[1])],
                [hi[0].max(p[0]), hi[1].max(p[1])],
            )
        }))
    }

    pub fn size(&self) -> [f64; 2] {
        self.bounds()
            .map_or([0.0, 0.0], |(lo, hi)| [hi[0] - lo[0], hi[1] - lo[1]])
    }

    pub fn map_points(&self, f: impl Fn([f64; 2]) -> [f64; 2]) -> Self {
        Self {
            quads: self.quads.iter().map(|q| q.map(&f)).collect(),
        }
    }

    pub fn mirrored_x(&self) -> Self {
        self.map_points(|[x, y]| [-x, y])
    }

    /// Quarter turn counter-clockwise.
    pub fn rotated_quarter(&self) -> Self {
        self.map_points(|[x, y]| [-y, x])
    }

    pub fn translated(&self, offset: [f64; 2]) -> Self {
        self.map_points(|[x, y]| [x + offset[0], y + offset[1]])
    }

    /// One Z-extruded solid per stroke, spanning `z0..z0 + depth`.
    pub fn cutters(
        &self,
        kernel: &mut dyn Kernel,
        z0: f64,
        depth: f64,
    ) -> Result<Vec<SolidHandle>, KernelError> {
        self.quads
            .iter()
            .map(|q| kernel.extrude(q, Axis::Z, z0, depth))
            .collect()
    }
}

/// Rectangle around segment `p → q`, extended by `half` past both ends so
/// joined strokes overlap. A zero-length segment becomes a square dot.
fn stroke_quad(p: [f64; 2], q: [f64; 2], half: f64) -> Quad {
    let (dx, dy) = (q[0] - p[0], q[1] - p[1]);
    let len = dx.hypot(dy);
    let (ux, uy) = if len > 1e-12 {
        (dx / len, dy / len)
    } else {
        (1.0, 0.0)
    };
    let (nx, ny) = (-uy * half, ux * half);
    let a = [p[0] - ux * half, p[1] - uy * half];
    let b = [q[0] + ux * half, q[1] + uy * half];
    [
        [a[0] - nx, a[1] - ny],
        [b[0] - nx, b[1] - ny],
        [b[0] + nx, b[1] + ny],
        [a[0] + nx, a[1] + ny],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn glyphs_scale_with_cap_height() {
        let small = TextOutline::layout("H", 6.0);
        let large = TextOutline::layout("H", 12.0);
        assert!(!small.quads.is_empty());
        let [sw, sh] = small.size();
        let [lw, lh] = large.size();
        assert_relative_eq!(lw, 2.0 * sw, epsilon = 1e-9);
        assert_relative_eq!(lh, 2.0 * sh, epsilon = 1e-9);
        assert!(sh > 0.6 * 6.0 && sh < 1.5 * 6.0 + STROKE, "H is {sh} tall");
    }

    #[test]
    fn lowercase_and_punctuation_are_drawn() {
        for text in ["units", "a-b", "x_1.5", "Q&A?"] {
            let outline = TextOutline::layout(text, 6.0);
            assert!(!outline.quads.is_empty(), "{text} drew nothing");
        }
        let upper = TextOutline::layout("tokens", 6.0);
        let lower = TextOutline::layout("TOKENS", 6.0);
        assert_ne!(upper, lower);
    }

    #[test]
    fn fit_shrinks_long_text_to_width() {
        let outline = TextOutline::fit("SUPPLY DEPOT", 60.0, 20.0, 10.0).unwrap();
        let [w, h] = outline.size();
        assert!(w <= 60.0 + 1e-9);
        assert!(h <= 20.0 + 1e-9);
        let (lo, hi) = outline.bounds().unwrap();
        assert_relative_eq!(lo[0] + hi[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(lo[1] + hi[1], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn fit_rejects_blank_and_tiny_text() {
        assert!(TextOutline::fit("   ", 50.0, 50.0, 10.0).is_none());
        assert!(TextOutline::fit("A VERY LONG NAME INDEED", 10.0, 50.0, 10.0).is_none());
    }

    #[test]
    fn unknown_glyphs_advance_without_strokes() {
        let plain = TextOutline::layout("AB", 6.0);
        let spaced = TextOutline::layout("A€B", 6.0);
        assert_eq!(plain.quads.len(), spaced.quads.len());
        assert!(spaced.size()[0] > plain.size()[0]);
    }

    #[test]
    fn rotation_swaps_extent() {
        let outline = TextOutline::fit("HEX", 80.0, 30.0, 8.0).unwrap();
        let [w, h] = outline.size();
        let [rw, rh] = outline.rotated_quarter().size();
        assert_relative_eq!(w, rh, epsilon = 1e-9);
        assert_relative_eq!(h, rw, epsilon = 1e-9);
    }
}
