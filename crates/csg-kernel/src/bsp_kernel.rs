use std::collections::HashSet;
use std::time::Instant;

use chull::ConvexHullWrapper;
use nalgebra::{Matrix4, Point3};
use slotmap::SlotMap;
use tracing::{debug, instrument};

use crate::bsp::Polygon;
use crate::primitives::{cuboid_polygons, cylinder_polygons, extrude_polygons};
use crate::solid::Csg;
use crate::traits::Kernel;
use crate::types::{Aabb, Axis, KernelError, SolidHandle, TriangleMesh};

/// Mesh boolean kernel backed by polygon BSP trees.
#[derive(Debug, Default)]
pub struct BspKernel {
    solids: SlotMap<SolidHandle, Csg>,
}

impl BspKernel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn solid(&self, handle: SolidHandle) -> Result<&Csg, KernelError> {
        self.solids
            .get(handle)
            .ok_or(KernelError::SolidNotFound { handle })
    }

    fn insert(&mut self, csg: Csg) -> SolidHandle {
        self.solids.insert(csg)
    }

    fn boolean(
        &mut self,
        operation: &str,
        a: SolidHandle,
        b: SolidHandle,
        op: impl Fn(&Csg, &Csg) -> Csg,
    ) -> Result<SolidHandle, KernelError> {
        let started = Instant::now();
        let result = op(self.solid(a)?, self.solid(b)?);
        debug!(
            operation,
            polygons = result.polygons().len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "boolean evaluated"
        );
        if result.is_empty() {
            return Err(KernelError::degenerate(operation, "result has no faces"));
        }
        Ok(self.insert(result))
    }
}

/// Vertices closer than a micrometer are one hull input point.
fn weld_key(p: &Point3<f64>) -> (i64, i64, i64) {
    (
        (p.x * 1e6).round() as i64,
        (p.y * 1e6).round() as i64,
        (p.z * 1e6).round() as i64,
    )
}

impl Kernel for BspKernel {
    fn cuboid(&mut self, min: [f64; 3], size: [f64; 3]) -> Result<SolidHandle, KernelError> {
        let polys = cuboid_polygons(min, size)?;
        Ok(self.insert(Csg::from_polygons(polys)))
    }

    fn cylinder(
        &mut self,
        axis: Axis,
        base_center: [f64; 3],
        radius: f64,
        length: f64,
        segments: u32,
    ) -> Result<SolidHandle, KernelError> {
        let polys = cylinder_polygons(axis, base_center, radius, length, segments)?;
        Ok(self.insert(Csg::from_polygons(polys)))
    }

    fn extrude(
        &mut self,
        profile: &[[f64; 2]],
        axis: Axis,
        start: f64,
        length: f64,
    ) -> Result<SolidHandle, KernelError> {
        let polys = extrude_polygons(profile, axis, start, length)?;
        Ok(self.insert(Csg::from_polygons(polys)))
    }

    #[instrument(skip(self))]
    fn hull(&mut self, solids: &[SolidHandle]) -> Result<SolidHandle, KernelError> {
        let mut points: Vec<Vec<f64>> = Vec::new();
        let mut seen = HashSet::new();
        for &handle in solids {
            for p in self.solid(handle)?.vertices() {
                if seen.insert(weld_key(p)) {
                    points.push(vec![p.x, p.y, p.z]);
                }
            }
        }
        if points.len() < 4 {
            return Err(KernelError::degenerate(
                "hull",
                format!("need at least 4 distinct points, got {}", points.len()),
            ));
        }

        let hull = ConvexHullWrapper::try_new(&points, None)
            .map_err(|e| KernelError::degenerate("hull", format!("{e:?}")))?;
        let (verts, indices) = hull.vertices_indices();
        let corners: Vec<Point3<f64>> = verts
            .iter()
            .map(|v| Point3::new(v[0], v[1], v[2]))
            .collect();
        let inside = Point3::from(
            corners.iter().fold(nalgebra::Vector3::<f64>::zeros(), |acc, p| acc + p.coords)
                / corners.len().max(1) as f64,
        );

        // Face winding is normalized against the hull's centroid.
        let polys: Vec<Polygon> = indices
            .chunks_exact(3)
            .filter_map(|tri| {
                let (a, b, c) = (corners[tri[0]], corners[tri[1]], corners[tri[2]]);
                let outward = (b - a).cross(&(c - a)).dot(&(a - inside)) >= 0.0;
                Polygon::new(if outward { vec![a, b, c] } else { vec![a, c, b] })
            })
            .collect();
        debug!(points = points.len(), faces = polys.len(), "convex hull built");
        if polys.len() < 4 {
            return Err(KernelError::degenerate("hull", "hull has no volume"));
        }
        Ok(self.insert(Csg::from_polygons(polys)))
    }

    fn transform(
        &mut self,
        solid: SolidHandle,
        matrix: &Matrix4<f64>,
    ) -> Result<SolidHandle, KernelError> {
        let moved = self.solid(solid)?.transform(matrix);
        if moved.is_empty() {
            return Err(KernelError::degenerate("transform", "transform collapsed every face"));
        }
        Ok(self.insert(moved))
    }

    #[instrument(skip(self))]
    fn union(&mut self, a: SolidHandle, b: SolidHandle) -> Result<SolidHandle, KernelError> {
        self.boolean("union", a, b, Csg::union)
    }

    #[instrument(skip(self))]
    fn subtract(&mut self, a: SolidHandle, b: SolidHandle) -> Result<SolidHandle, KernelError> {
        self.boolean("subtract", a, b, Csg::difference)
    }

    #[instrument(skip(self))]
    fn intersect(&mut self, a: SolidHandle, b: SolidHandle) -> Result<SolidHandle, KernelError> {
        self.boolean("intersect", a, b, Csg::intersection)
    }

    fn bounding_box(&self, solid: SolidHandle) -> Result<Aabb, KernelError> {
        self.solid(solid)?
            .bounding_box()
            .ok_or_else(|| KernelError::degenerate("bounding_box", "solid has no vertices"))
    }

    fn tessellate(&self, solid: SolidHandle) -> Result<TriangleMesh, KernelError> {
        Ok(self.solid(solid)?.to_mesh())
    }

    fn release(&mut self, solid: SolidHandle) {
        self.solids.remove(solid);
    }

    fn solid_count(&self) -> usize {
        self.solids.len()
    }
}
