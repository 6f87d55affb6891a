use serde::{Deserialize, Serialize};

slotmap::new_key_type! {
    /// Opaque handle to a solid owned by a kernel session.
    /// Never persisted. Valid only for the kernel that issued it.
    pub struct SolidHandle;
}

/// Coordinate axis used for extrusion and cylinder directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Split a world point into profile coordinates `(u, v)` and the
    /// position `w` along this axis. Inverse of [`Axis::compose`].
    pub fn decompose(self, p: [f64; 3]) -> (f64, f64, f64) {
        match self {
            Axis::X => (p[1], p[2], p[0]),
            Axis::Y => (p[0], p[2], p[1]),
            Axis::Z => (p[0], p[1], p[2]),
        }
    }

    /// Map profile coordinates and an axial position to a world point.
    ///
    /// Profiles extruded along X live in the YZ plane, along Y in the XZ
    /// plane, along Z in the XY plane.
    pub fn compose(self, u: f64, v: f64, w: f64) -> [f64; 3] {
        match self {
            Axis::X => [w, u, v],
            Axis::Y => [u, w, v],
            Axis::Z => [u, v, w],
        }
    }
}

/// Axis-aligned bounding box in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Aabb {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    pub fn from_min_size(min: [f64; 3], size: [f64; 3]) -> Self {
        Self {
            min,
            max: [min[0] + size[0], min[1] + size[1], min[2] + size[2]],
        }
    }

    /// Smallest box containing all points. `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = [f64; 3]>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bb = Aabb::new(first, first);
        for p in iter {
            bb.include_point(p);
        }
        Some(bb)
    }

    pub fn include_point(&mut self, p: [f64; 3]) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }

    pub fn size(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn center(&self) -> [f64; 3] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }

    pub fn volume(&self) -> f64 {
        let s = self.size();
        s[0].max(0.0) * s[1].max(0.0) * s[2].max(0.0)
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut out = *self;
        out.include_point(other.min);
        out.include_point(other.max);
        out
    }

    /// Overlapping region, or `None` when the boxes do not overlap.
    pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
        let mut out = *self;
        for i in 0..3 {
            out.min[i] = self.min[i].max(other.min[i]);
            out.max[i] = self.max[i].min(other.max[i]);
            if out.min[i] > out.max[i] {
                return None;
            }
        }
        Some(out)
    }

    /// True when the boxes overlap by more than `tolerance` on every axis.
    pub fn overlaps(&self, other: &Aabb, tolerance: f64) -> bool {
        (0..3).all(|i| {
            self.min[i] < other.max[i] - tolerance && other.min[i] < self.max[i] - tolerance
        })
    }

    /// True when `other` lies inside this box, allowing `tolerance` of overhang.
    pub fn contains(&self, other: &Aabb, tolerance: f64) -> bool {
        (0..3).all(|i| {
            other.min[i] >= self.min[i] - tolerance && other.max[i] <= self.max[i] + tolerance
        })
    }

    pub fn translated(&self, offset: [f64; 3]) -> Aabb {
        Aabb {
            min: [
                self.min[0] + offset[0],
                self.min[1] + offset[1],
                self.min[2] + offset[2],
            ],
            max: [
                self.max[0] + offset[0],
                self.max[1] + offset[1],
                self.max[2] + offset[2],
            ],
        }
    }

    /// The eight corner points.
    pub fn corners(&self) -> [[f64; 3]; 8] {
        let (a, b) = (self.min, self.max);
        [
            [a[0], a[1], a[2]],
            [b[0], a[1], a[2]],
            [b[0], b[1], a[2]],
            [a[0], b[1], a[2]],
            [a[0], a[1], b[2]],
            [b[0], a[1], b[2]],
            [b[0], b[1], b[2]],
            [a[0], b[1], b[2]],
        ]
    }
}

/// Errors from kernel operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    #[error("solid not found: {handle:?}")]
    SolidNotFound { handle: SolidHandle },

    #[error("invalid profile: {reason}")]
    InvalidProfile { reason: String },

    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("degenerate geometry from {operation}: {reason}")]
    DegenerateGeometry { operation: String, reason: String },
}

impl KernelError {
    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        KernelError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(operation: &str, reason: impl Into<String>) -> Self {
        KernelError::DegenerateGeometry {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }
}

/// Triangulated boundary of a solid, ready for export or display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Vertex positions [x, y, z, x, y, z, ...]
    pub positions: Vec<f32>,
    /// Vertex normals [nx, ny, nz, ...]
    pub normals: Vec<f32>,
    /// Triangle indices [i0, i1, i2, ...]
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn add_vertex(&mut self, pos: [f64; 3], normal: [f64; 3]) -> u32 {
        let idx = self.vertex_count() as u32;
        self.positions.extend(pos.iter().map(|c| *c as f32));
        self.normals.extend(normal.iter().map(|c| *c as f32));
        idx
    }

    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }

    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.vertex_count() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|i| i + offset));
    }

    pub fn vertex(&self, index: u32) -> [f64; 3] {
        let i = index as usize * 3;
        [
            f64::from(self.positions[i]),
            f64::from(self.positions[i + 1]),
            f64::from(self.positions[i + 2]),
        ]
    }

    /// Iterate triangles as vertex position triples.
    pub fn triangles(&self) -> impl Iterator<Item = [[f64; 3]; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [self.vertex(t[0]), self.vertex(t[1]), self.vertex(t[2])])
    }

    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points((0..self.vertex_count() as u32).map(|i| self.vertex(i)))
    }
}
