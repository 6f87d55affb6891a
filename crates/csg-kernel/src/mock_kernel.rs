//! MockKernel: deterministic test double implementing Kernel.
//!
//! Tracks only bounding boxes and records every call, so builder tests can
//! assert on which features were cut without paying for mesh booleans.

use nalgebra::{Matrix4, Point3};
use slotmap::SlotMap;

use crate::primitives::{cuboid_polygons, normalize_profile};
use crate::solid::Csg;
use crate::traits::Kernel;
use crate::types::{Aabb, Axis, KernelError, SolidHandle, TriangleMesh};

/// One recorded kernel call.
#[derive(Debug, Clone, PartialEq)]
pub enum MockOp {
    Cuboid { bounds: Aabb },
    Cylinder { axis: Axis, bounds: Aabb },
    Extrude { axis: Axis, bounds: Aabb },
    Hull { inputs: usize },
    Transform,
    Union,
    Subtract { tool: Aabb },
    Intersect,
}

/// Deterministic test double for the solid kernel.
#[derive(Debug, Default)]
pub struct MockKernel {
    solids: SlotMap<SolidHandle, Aabb>,
    ops: Vec<MockOp>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call made so far, in order.
    pub fn ops(&self) -> &[MockOp] {
        &self.ops
    }

    pub fn count(&self, pred: impl Fn(&MockOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    /// Bounding boxes of every primitive subtracted from another solid.
    pub fn subtracted_tools(&self) -> Vec<Aabb> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                MockOp::Subtract { tool } => Some(*tool),
                _ => None,
            })
            .collect()
    }

    fn get(&self, handle: SolidHandle) -> Result<Aabb, KernelError> {
        self.solids
            .get(handle)
            .copied()
            .ok_or(KernelError::SolidNotFound { handle })
    }

    fn insert(&mut self, bounds: Aabb, op: MockOp) -> SolidHandle {
        self.ops.push(op);
        self.solids.insert(bounds)
    }
}

fn check_positive(name: &str, value: f64) -> Result<(), KernelError> {
    if value.is_finite() && value > 1e-9 {
        Ok(())
    } else {
        Err(KernelError::InvalidParameter {
            name: name.to_string(),
            reason: format!("must be positive, got {value}"),
        })
    }
}

impl Kernel for MockKernel {
    fn cuboid(&mut self, min: [f64; 3], size: [f64; 3]) -> Result<SolidHandle, KernelError> {
        for s in size {
            check_positive("size", s)?;
        }
        let bounds = Aabb::from_min_size(min, size);
        Ok(self.insert(bounds, MockOp::Cuboid { bounds }))
    }

    fn cylinder(
        &mut self,
        axis: Axis,
        base_center: [f64; 3],
        radius: f64,
        length: f64,
        _segments: u32,
    ) -> Result<SolidHandle, KernelError> {
        check_positive("radius", radius)?;
        check_positive("length", length)?;
        let (u, v, w) = axis.decompose(base_center);
        let bounds = Aabb::new(
            axis.compose(u - radius, v - radius, w),
            axis.compose(u + radius, v + radius, w + length),
        );
        Ok(self.insert(bounds, MockOp::Cylinder { axis, bounds }))
    }

    fn extrude(
        &mut self,
        profile: &[[f64; 2]],
        axis: Axis,
        start: f64,
        length: f64,
    ) -> Result<SolidHandle, KernelError> {
        check_positive("length", length)?;
        let pts = normalize_profile(profile)?;
        let corners = pts.iter().flat_map(|p| {
            [
                axis.compose(p[0], p[1], start),
                axis.compose(p[0], p[1], start + length),
            ]
        });
        let bounds = Aabb::from_points(corners)
            .ok_or_else(|| KernelError::degenerate("extrude", "empty profile"))?;
        Ok(self.insert(bounds, MockOp::Extrude { axis, bounds }))
    }

    fn hull(&mut self, solids: &[SolidHandle]) -> Result<SolidHandle, KernelError> {
        let mut bounds: Option<Aabb> = None;
        for &h in solids {
            let b = self.get(h)?;
            bounds = Some(bounds.map_or(b, |acc| acc.union(&b)));
        }
        let bounds = bounds.ok_or_else(|| KernelError::degenerate("hull", "no input solids"))?;
        Ok(self.insert(
            bounds,
            MockOp::Hull {
                inputs: solids.len(),
            },
        ))
    }

    fn transform(
        &mut self,
        solid: SolidHandle,
        matrix: &Matrix4<f64>,
    ) -> Result<SolidHandle, KernelError> {
        let b = self.get(solid)?;
        let moved = b.corners().map(|c| {
            let p = matrix.transform_point(&Point3::new(c[0], c[1], c[2]));
            [p.x, p.y, p.z]
        });
        let bounds = Aabb::from_points(moved)
            .ok_or_else(|| KernelError::degenerate("transform", "no corners"))?;
        Ok(self.insert(bounds, MockOp::Transform))
    }

    fn union(&mut self, a: SolidHandle, b: SolidHandle) -> Result<SolidHandle, KernelError> {
        let bounds = self.get(a)?.union(&self.get(b)?);
        Ok(self.insert(bounds, MockOp::Union))
    }

    fn subtract(&mut self, a: SolidHandle, b: SolidHandle) -> Result<SolidHandle, KernelError> {
        let (base, tool) = (self.get(a)?, self.get(b)?);
        Ok(self.insert(base, MockOp::Subtract { tool }))
    }

    fn intersect(&mut self, a: SolidHandle, b: SolidHandle) -> Result<SolidHandle, KernelError> {
        let bounds = self
            .get(a)?
            .intersection(&self.get(b)?)
            .ok_or_else(|| KernelError::degenerate("intersect", "bounding boxes are disjoint"))?;
        Ok(self.insert(bounds, MockOp::Intersect))
    }

    fn bounding_box(&self, solid: SolidHandle) -> Result<Aabb, KernelError> {
        self.get(solid)
    }

    fn tessellate(&self, solid: SolidHandle) -> Result<TriangleMesh, KernelError> {
        let b = self.get(solid)?;
        let polys = cuboid_polygons(b.min, b.size())?;
        Ok(Csg::from_polygons(polys).to_mesh())
    }

    fn release(&mut self, solid: SolidHandle) {
        self.solids.remove(solid);
    }

    fn solid_count(&self) -> usize {
        self.solids.len()
    }
}
