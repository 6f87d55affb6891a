//! Polygon BSP trees for mesh booleans.
//!
//! Nodes live in a flat arena and every traversal uses an explicit work
//! stack, so deep trees (long runs of coplanar-free splits on fine
//! cylinders) never touch the thread stack.

use nalgebra::{Point3, Vector3};

/// Distance below which a point is treated as lying on a plane.
pub const PLANE_EPSILON: f64 = 1e-5;

const COPLANAR: u8 = 0;
const FRONT: u8 = 1;
const BACK: u8 = 2;
const SPANNING: u8 = 3;

/// Oriented plane `normal · p = w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3<f64>,
    pub w: f64,
}

impl Plane {
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    pub fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&p.coords) - self.w
    }

    /// Classify `polygon` against this plane and push it, or its split
    /// halves, into the matching output list.
    pub fn split_polygon(
        &self,
        polygon: &Polygon,
        coplanar_front: &mut Vec<Polygon>,
        coplanar_back: &mut Vec<Polygon>,
        front: &mut Vec<Polygon>,
        back: &mut Vec<Polygon>,
    ) {
        let mut polygon_type = COPLANAR;
        let types: Vec<u8> = polygon
            .vertices
            .iter()
            .map(|v| {
                let t = self.signed_distance(v);
                let ty = if t < -PLANE_EPSILON {
                    BACK
                } else if t > PLANE_EPSILON {
                    FRONT
                } else {
                    COPLANAR
                };
                polygon_type |= ty;
                ty
            })
            .collect();

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            }
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let n = polygon.vertices.len();
                let mut f = Vec::with_capacity(n + 1);
                let mut b = Vec::with_capacity(n + 1);
                for i in 0..n {
                    let j = (i + 1) % n;
                    let (ti, tj) = (types[i], types[j]);
                    let (vi, vj) = (polygon.vertices[i], polygon.vertices[j]);
                    if ti != BACK {
                        f.push(vi);
                    }
                    if ti != FRONT {
                        b.push(vi);
                    }
                    if (ti | tj) == SPANNING {
                        let denom = self.normal.dot(&(vj - vi));
                        let t = (self.w - self.normal.dot(&vi.coords)) / denom;
                        let v = vi + (vj - vi) * t;
                        f.push(v);
                        b.push(v);
                    }
                }
                if f.len() >= 3 {
                    front.push(Polygon::with_plane(f, polygon.plane));
                }
                if b.len() >= 3 {
                    back.push(Polygon::with_plane(b, polygon.plane));
                }
            }
        }
    }
}

/// Convex planar polygon with counter-clockwise winding seen from outside.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Point3<f64>>,
    pub plane: Plane,
}

impl Polygon {
    /// Build a polygon, deriving its plane with Newell's method.
    /// Returns `None` for degenerate (zero-area) input.
    pub fn new(vertices: Vec<Point3<f64>>) -> Option<Polygon> {
        if vertices.len() < 3 {
            return None;
        }
        let mut n = Vector3::<f64>::zeros();
        for i in 0..vertices.len() {
            let a = &vertices[i];
            let b = &vertices[(i + 1) % vertices.len()];
            n.x += (a.y - b.y) * (a.z + b.z);
            n.y += (a.z - b.z) * (a.x + b.x);
            n.z += (a.x - b.x) * (a.y + b.y);
        }
        let len = n.norm();
        if len < 1e-12 {
            return None;
        }
        let normal = n / len;
        let w = normal.dot(&vertices[0].coords);
        Some(Polygon {
            vertices,
            plane: Plane { normal, w },
        })
    }

    pub(crate) fn with_plane(vertices: Vec<Point3<f64>>, plane: Plane) -> Polygon {
        Polygon { vertices, plane }
    }

    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }

    /// Area of the polygon (fan sum, valid for convex input).
    pub fn area(&self) -> f64 {
        let v0 = self.vertices[0];
        self.vertices
            .windows(2)
            .skip(1)
            .map(|w| (w[0] - v0).cross(&(w[1] - v0)).norm() / 2.0)
            .sum()
    }
}

#[derive(Debug, Clone, Default)]
struct BspNode {
    plane: Option<Plane>,
    front: Option<usize>,
    back: Option<usize>,
    polygons: Vec<Polygon>,
}

/// Binary space partition over a set of polygons. Node 0 is the root.
#[derive(Debug, Clone)]
pub struct BspTree {
    nodes: Vec<BspNode>,
}

impl BspTree {
    pub fn new(polygons: Vec<Polygon>) -> BspTree {
        let mut tree = BspTree {
            nodes: vec![BspNode::default()],
        };
        tree.build(polygons);
        tree
    }

    /// Insert polygons, splitting them by existing node planes and creating
    /// new nodes where a subtree is missing.
    pub fn build(&mut self, polygons: Vec<Polygon>) {
        let mut work = vec![(0usize, polygons)];
        while let Some((idx, polys)) = work.pop() {
            let Some(first) = polys.first() else {
                continue;
            };
            let plane = *self.nodes[idx].plane.get_or_insert(first.plane);
            let mut front = Vec::new();
            let mut back = Vec::new();
            let mut coplanar_front = Vec::new();
            let mut coplanar_back = Vec::new();
            for p in &polys {
                plane.split_polygon(
                    p,
                    &mut coplanar_front,
                    &mut coplanar_back,
                    &mut front,
                    &mut back,
                );
            }
            let node = &mut self.nodes[idx];
            node.polygons.append(&mut coplanar_front);
            node.polygons.append(&mut coplanar_back);

            if !front.is_empty() {
                let child = self.child(idx, true);
                work.push((child, front));
            }
            if !back.is_empty() {
                let child = self.child(idx, false);
                work.push((child, back));
            }
        }
    }

    fn child(&mut self, idx: usize, front: bool) -> usize {
        let existing = if front {
            self.nodes[idx].front
        } else {
            self.nodes[idx].back
        };
        if let Some(child) = existing {
            return child;
        }
        let child = self.nodes.len();
        self.nodes.push(BspNode::default());
        if front {
            self.nodes[idx].front = Some(child);
        } else {
            self.nodes[idx].back = Some(child);
        }
        child
    }

    /// Swap solid space and empty space.
    pub fn invert(&mut self) {
        for node in &mut self.nodes {
            for p in &mut node.polygons {
                p.flip();
            }
            if let Some(plane) = node.plane.as_mut() {
                plane.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);
        }
    }

    /// Remove the parts of `polygons` that lie inside this tree's solid.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let mut kept = Vec::new();
        let mut work = vec![(0usize, polygons)];
        while let Some((idx, polys)) = work.pop() {
            let node = &self.nodes[idx];
            let Some(plane) = node.plane else {
                kept.extend(polys);
                continue;
            };
            let mut front = Vec::new();
            let mut back = Vec::new();
            let mut coplanar_front = Vec::new();
            let mut coplanar_back = Vec::new();
            for p in &polys {
                plane.split_polygon(
                    p,
                    &mut coplanar_front,
                    &mut coplanar_back,
                    &mut front,
                    &mut back,
                );
            }
            front.append(&mut coplanar_front);
            back.append(&mut coplanar_back);

            match node.front {
                Some(child) => work.push((child, front)),
                None => kept.extend(front),
            }
            if let Some(child) = node.back {
                work.push((child, back));
            }
        }
        kept
    }

    /// Clip every polygon in this tree against `other`.
    pub fn clip_to(&mut self, other: &BspTree) {
        for node in &mut self.nodes {
            let polys = std::mem::take(&mut node.polygons);
            node.polygons = other.clip_polygons(polys);
        }
    }

    pub fn all_polygons(&self) -> Vec<Polygon> {
        self.nodes
            .iter()
            .flat_map(|n| n.polygons.iter().cloned())
            .collect()
    }
}
