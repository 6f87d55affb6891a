use nalgebra::{Matrix4, Point3};

use crate::bsp::{BspTree, Polygon, PLANE_EPSILON};
use crate::types::{Aabb, TriangleMesh};

/// Polygon soup describing one solid's boundary.
#[derive(Debug, Clone, Default)]
pub struct Csg {
    polygons: Vec<Polygon>,
}

impl Csg {
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.polygons.iter().flat_map(|p| p.vertices.iter())
    }

    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices().map(|v| [v.x, v.y, v.z]))
    }

    fn disjoint(&self, other: &Csg) -> bool {
        match (self.bounding_box(), other.bounding_box()) {
            (Some(a), Some(b)) => !a.overlaps(&b, -PLANE_EPSILON),
            _ => true,
        }
    }

    /// self ∪ other
    pub fn union(&self, other: &Csg) -> Csg {
        if self.disjoint(other) {
            let mut polygons = self.polygons.clone();
            polygons.extend(other.polygons.iter().cloned());
            return Csg::from_polygons(polygons);
        }
        let mut a = BspTree::new(self.polygons.clone());
        let mut b = BspTree::new(other.polygons.clone());
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(b.all_polygons());
        Csg::from_polygons(a.all_polygons())
    }

    /// self \ other
    pub fn difference(&self, other: &Csg) -> Csg {
        if self.disjoint(other) {
            return self.clone();
        }
        let mut a = BspTree::new(self.polygons.clone());
        let mut b = BspTree::new(other.polygons.clone());
        a.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(b.all_polygons());
        a.invert();
        Csg::from_polygons(a.all_polygons())
    }

    /// self ∩ other
    pub fn intersection(&self, other: &Csg) -> Csg {
        if self.disjoint(other) {
            return Csg::default();
        }
        let mut a = BspTree::new(self.polygons.clone());
        let mut b = BspTree::new(other.polygons.clone());
        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.build(b.all_polygons());
        a.invert();
        Csg::from_polygons(a.all_polygons())
    }

    /// Apply an affine transform. Mirroring transforms keep faces outward.
    pub fn transform(&self, matrix: &Matrix4<f64>) -> Csg {
        let mirrored = matrix.fixed_view::<3, 3>(0, 0).determinant() < 0.0;
        let polygons = self
            .polygons
            .iter()
            .filter_map(|p| {
                let mut verts: Vec<Point3<f64>> =
                    p.vertices.iter().map(|v| matrix.transform_point(v)).collect();
                if mirrored {
                    verts.reverse();
                }
                Polygon::new(verts)
            })
            .collect();
        Csg::from_polygons(polygons)
    }

    /// Fan-triangulate every polygon with flat per-face normals.
    pub fn to_mesh(&self) -> TriangleMesh {
        let mut mesh = TriangleMesh::new();
        for poly in &self.polygons {
            let n = poly.plane.normal;
            let normal = [n.x, n.y, n.z];
            let ids: Vec<u32> = poly
                .vertices
                .iter()
                .map(|v| mesh.add_vertex([v.x, v.y, v.z], normal))
                .collect();
            for i in 1..ids.len().saturating_sub(1) {
                mesh.add_triangle(ids[0], ids[i], ids[i + 1]);
            }
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::cuboid_polygons;
    use approx::assert_relative_eq;

    fn cube(min: [f64; 3], size: f64) -> Csg {
        Csg::from_polygons(cuboid_polygons(min, [size; 3]).unwrap())
    }

    fn area(csg: &Csg) -> f64 {
        csg.polygons().iter().map(|p| p.area()).sum()
    }

    #[test]
    fn subtract_corner_keeps_outer_bounds() {
        let a = cube([0.0; 3], 2.0);
        let b = cube([1.0, 1.0, 1.0], 2.0);
        let d = a.difference(&b);
        let bb = d.bounding_box().unwrap();
        assert_relative_eq!(bb.max[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(bb.min[2], 0.0, epsilon = 1e-9);
        // Removing a unit corner from a 2-cube leaves the surface area unchanged.
        assert_relative_eq!(area(&d), 24.0, epsilon = 1e-6);
    }

    #[test]
    fn union_of_disjoint_cubes_concatenates() {
        let a = cube([0.0; 3], 1.0);
        let b = cube([5.0, 0.0, 0.0], 1.0);
        let u = a.union(&b);
        assert_eq!(u.polygons().len(), 12);
    }

    #[test]
    fn intersection_of_overlapping_cubes() {
        let a = cube([0.0; 3], 2.0);
        let b = cube([1.0, 1.0, 1.0], 2.0);
        let bb = a.intersection(&b).bounding_box().unwrap();
        assert_relative_eq!(bb.min[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(bb.max[0], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn mirror_transform_keeps_winding_outward() {
        let a = cube([0.0; 3], 1.0);
        let mut m = Matrix4::identity();
        m[(0, 0)] = -1.0;
        let mirrored = a.transform(&m);
        for p in mirrored.polygons() {
            let c = p.vertices.iter().fold(nalgebra::Vector3::zeros(), |acc, v| acc + v.coords)
                / p.vertices.len() as f64;
            let center = nalgebra::Vector3::new(-0.5, 0.5, 0.5);
            assert!(p.plane.normal.dot(&(c - center)) > 0.0);
        }
    }

    #[test]
    fn mesh_has_two_triangles_per_cube_face() {
        let mesh = cube([0.0; 3], 1.0).to_mesh();
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertex_count(), 24);
    }
}
