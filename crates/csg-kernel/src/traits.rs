use nalgebra::Matrix4;

use crate::types::{Aabb, Axis, KernelError, SolidHandle, TriangleMesh};

/// Solid modeling kernel used by the part builders.
/// Implemented by BspKernel (mesh booleans) and MockKernel (deterministic test double).
pub trait Kernel {
    /// Axis-aligned box from its minimum corner and size.
    fn cuboid(&mut self, min: [f64; 3], size: [f64; 3]) -> Result<SolidHandle, KernelError>;

    /// Cylinder with its base circle centered at `base_center`, extending
    /// `length` along the positive `axis` direction.
    fn cylinder(
        &mut self,
        axis: Axis,
        base_center: [f64; 3],
        radius: f64,
        length: f64,
        segments: u32,
    ) -> Result<SolidHandle, KernelError>;

    /// Extrude a convex 2D profile along `axis` from `start` to `start + length`.
    /// See [`Axis::compose`] for how profile coordinates map to world space.
    fn extrude(
        &mut self,
        profile: &[[f64; 2]],
        axis: Axis,
        start: f64,
        length: f64,
    ) -> Result<SolidHandle, KernelError>;

    /// Convex hull of all the given solids.
    fn hull(&mut self, solids: &[SolidHandle]) -> Result<SolidHandle, KernelError>;

    /// Affine transform of a solid into a new solid.
    fn transform(
        &mut self,
        solid: SolidHandle,
        matrix: &Matrix4<f64>,
    ) -> Result<SolidHandle, KernelError>;

    /// Boolean union of two solids.
    fn union(&mut self, a: SolidHandle, b: SolidHandle) -> Result<SolidHandle, KernelError>;

    /// Boolean subtraction: a minus b.
    fn subtract(&mut self, a: SolidHandle, b: SolidHandle) -> Result<SolidHandle, KernelError>;

    /// Boolean intersection of two solids.
    fn intersect(&mut self, a: SolidHandle, b: SolidHandle) -> Result<SolidHandle, KernelError>;

    fn bounding_box(&self, solid: SolidHandle) -> Result<Aabb, KernelError>;

    /// Triangulate a solid's boundary.
    fn tessellate(&self, solid: SolidHandle) -> Result<TriangleMesh, KernelError>;

    /// Drop a solid that is no longer needed. Unknown handles are ignored.
    fn release(&mut self, solid: SolidHandle);

    /// Number of live solids in this session.
    fn solid_count(&self) -> usize;

    fn translate(
        &mut self,
        solid: SolidHandle,
        offset: [f64; 3],
    ) -> Result<SolidHandle, KernelError> {
        self.transform(
            solid,
            &Matrix4::new_translation(&nalgebra::Vector3::new(offset[0], offset[1], offset[2])),
        )
    }

    /// Union of many solids, releasing the intermediates. `None` when empty.
    fn union_all(&mut self, solids: &[SolidHandle]) -> Result<Option<SolidHandle>, KernelError> {
        let Some((&first, rest)) = solids.split_first() else {
            return Ok(None);
        };
        let mut acc = first;
        for &next in rest {
            let merged = self.union(acc, next)?;
            self.release(acc);
            self.release(next);
            acc = merged;
        }
        Ok(Some(acc))
    }

    /// Subtract every tool from `base`, releasing `base` and the tools.
    /// Tools are merged first so the base is only rebuilt once.
    fn subtract_all(
        &mut self,
        base: SolidHandle,
        tools: &[SolidHandle],
    ) -> Result<SolidHandle, KernelError> {
        let Some(tool) = self.union_all(tools)? else {
            return Ok(base);
        };
        let cut = self.subtract(base, tool)?;
        self.release(base);
        self.release(tool);
        Ok(cut)
    }
}
