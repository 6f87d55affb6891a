//! Per-mesh statistics and validation.
//!
//! Edges are matched by welded vertex position, not by index, because the
//! kernel emits per-face vertices.

use std::collections::HashMap;
use std::fmt;

use csg_kernel::TriangleMesh;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::AnalysisError;

/// Faces with less area than this are degenerate.
pub const DEGENERATE_AREA: f64 = 1e-10;
/// Positions are welded on a grid of this many steps per millimeter.
const WELD_SCALE: f64 = 1e4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
    pub dimensions: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshStats {
    pub vertices: usize,
    pub faces: usize,
    /// Enclosed volume; only meaningful for a closed shell.
    pub volume_mm3: Option<f64>,
    pub surface_area_mm2: f64,
    pub bounding_box: BoundingBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshValidation {
    pub is_watertight: bool,
    pub is_winding_consistent: bool,
    /// V − E + F over welded vertices and edges.
    pub euler_number: i64,
}

/// Hard defects that make a mesh unfit for printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MeshDefect {
    DegenerateFaces { count: usize },
}

impl fmt::Display for MeshDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshDefect::DegenerateFaces { count } => {
                write!(f, "{count} degenerate faces (zero area)")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MeshWarning {
    NotWatertight { open_edges: usize },
    InconsistentWinding { repeated_edges: usize },
}

impl fmt::Display for MeshWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshWarning::NotWatertight { open_edges } => {
                write!(f, "mesh is not watertight ({open_edges} unpaired edges)")
            }
            MeshWarning::InconsistentWinding { repeated_edges } => write!(
                f,
                "face winding is inconsistent ({repeated_edges} edges traversed twice in one direction)"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshReport {
    pub name: String,
    pub stats: MeshStats,
    pub validation: MeshValidation,
    pub errors: Vec<MeshDefect>,
    pub warnings: Vec<MeshWarning>,
}

impl MeshReport {
    /// Problems worth a line in a combined summary. Open shells are left
    /// out: cut parts are routinely reported open by edge matching.
    pub fn issues(&self) -> Vec<String> {
        let errors = self.errors.iter().map(|e| format!("{}: {e}", self.name));
        let warnings = self
            .warnings
            .iter()
            .filter(|w| !matches!(w, MeshWarning::NotWatertight { .. }))
            .map(|w| format!("{}: {w}", self.name));
        errors.chain(warnings).collect()
    }
}

#[derive(Debug, Default)]
struct Topology {
    vertices: usize,
    edges: usize,
    open_edges: usize,
    repeated_edges: usize,
}

type WeldKey = (i64, i64, i64);

fn weld_key(p: [f64; 3]) -> WeldKey {
    let q = |v: f64| (v * WELD_SCALE).round() as i64;
    (q(p[0]), q(p[1]), q(p[2]))
}

fn topology(triangles: &[[[f64; 3]; 3]]) -> Topology {
    let mut ids: HashMap<WeldKey, u32> = HashMap::new();
    let mut directed: HashMap<(u32, u32), usize> = HashMap::new();
    for tri in triangles.iter().copied() {
        let v = tri.map(|p| {
            let next = ids.len() as u32;
            *ids.entry(weld_key(p)).or_insert(next)
        });
        for (a, b) in [(v[0], v[1]), (v[1], v[2]), (v[2], v[0])] {
            if a != b {
                *directed.entry((a, b)).or_insert(0) += 1;
            }
        }
    }

    let mut undirected: HashMap<(u32, u32), usize> = HashMap::new();
    let mut repeated_edges = 0;
    for (&(a, b), &count) in &directed {
        *undirected.entry((a.min(b), a.max(b))).or_insert(0) += count;
        repeated_edges += count.saturating_sub(1);
    }
    Topology {
        vertices: ids.len(),
        edges: undirected.len(),
        open_edges: undirected.values().filter(|&&c| c != 2).count(),
        repeated_edges,
    }
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn triangle_area([a, b, c]: &[[f64; 3]; 3]) -> f64 {
    let n = cross(sub(*b, *a), sub(*c, *a));
    dot(n, n).sqrt() / 2.0
}

/// Signed volume by the divergence theorem: a sum of origin tetrahedra.
fn signed_volume(triangles: &[[[f64; 3]; 3]]) -> f64 {
    triangles
        .iter()
        .map(|[a, b, c]| dot(*a, cross(*b, *c)))
        .sum::<f64>()
        / 6.0
}

/// Statistics and validation for one mesh.
#[instrument(skip(mesh), fields(triangles = mesh.triangle_count()))]
pub fn analyze_mesh(name: &str, mesh: &TriangleMesh) -> Result<MeshReport, AnalysisError> {
    let vertex_count = mesh.vertex_count();
    if let Some(&index) = mesh.indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(AnalysisError::IndexOutOfRange {
            name: name.to_string(),
            index,
            vertex_count,
        });
    }
    let empty = || AnalysisError::EmptyMesh {
        name: name.to_string(),
    };
    if mesh.is_empty() {
        return Err(empty());
    }
    let aabb = mesh.bounding_box().ok_or_else(empty)?;

    let triangles: Vec<[[f64; 3]; 3]> = mesh.triangles().collect();
    let areas: Vec<f64> = triangles.iter().map(triangle_area).collect();
    let degenerate = areas.iter().filter(|&&a| a < DEGENERATE_AREA).count();
    let topo = topology(&triangles);
    let is_watertight = topo.open_edges == 0;
    let is_winding_consistent = topo.repeated_edges == 0;
    debug!(
        open_edges = topo.open_edges,
        repeated_edges = topo.repeated_edges,
        degenerate,
        "mesh topology"
    );

    let mut errors = Vec::new();
    if degenerate > 0 {
        errors.push(MeshDefect::DegenerateFaces { count: degenerate });
    }
    let mut warnings = Vec::new();
    if !is_watertight {
        warnings.push(MeshWarning::NotWatertight {
            open_edges: topo.open_edges,
        });
    }
    if !is_winding_consistent {
        warnings.push(MeshWarning::InconsistentWinding {
            repeated_edges: topo.repeated_edges,
        });
    }

    Ok(MeshReport {
        name: name.to_string(),
        stats: MeshStats {
            vertices: vertex_count,
            faces: triangles.len(),
            volume_mm3: is_watertight.then(|| signed_volume(&triangles)),
            surface_area_mm2: areas.iter().sum(),
            bounding_box: BoundingBox {
                min: aabb.min,
                max: aabb.max,
                dimensions: aabb.size(),
            },
        },
        validation: MeshValidation {
            is_watertight,
            is_winding_consistent,
            euler_number: topo.vertices as i64 - topo.edges as i64 + triangles.len() as i64,
        },
        errors,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use csg_kernel::{BspKernel, Kernel};

    fn cube_mesh(size: f64) -> TriangleMesh {
        let mut k = BspKernel::new();
        let cube = k.cuboid([0.0; 3], [size; 3]).unwrap();
        k.tessellate(cube).unwrap()
    }

    #[test]
    fn closed_cube_is_watertight_with_volume() {
        let report = analyze_mesh("cube", &cube_mesh(10.0)).unwrap();
        assert!(report.validation.is_watertight);
        assert!(report.validation.is_winding_consistent);
        assert_eq!(report.validation.euler_number, 2);
        assert_relative_eq!(report.stats.volume_mm3.unwrap(), 1000.0, epsilon = 1e-3);
        assert_relative_eq!(report.stats.surface_area_mm2, 600.0, epsilon = 1e-3);
        assert_eq!(report.stats.bounding_box.dimensions, [10.0; 3]);
        assert!(report.errors.is_empty() && report.warnings.is_empty());
    }

    #[test]
    fn open_shell_has_no_volume_and_no_summary_issue() {
        let mut mesh = cube_mesh(10.0);
        mesh.indices.truncate(mesh.indices.len() - 3);
        let report = analyze_mesh("open", &mesh).unwrap();
        assert!(!report.validation.is_watertight);
        assert_eq!(report.stats.volume_mm3, None);
        assert!(matches!(
            report.warnings[0],
            MeshWarning::NotWatertight { open_edges: 3 }
        ));
        assert!(report.issues().is_empty());
    }

    #[test]
    fn flipped_face_breaks_winding() {
        let mut mesh = cube_mesh(10.0);
        mesh.indices.swap(0, 1);
        let report = analyze_mesh("flipped", &mesh).unwrap();
        assert!(!report.validation.is_winding_consistent);
        assert_eq!(report.issues().len(), 1);
        assert!(report.issues()[0].starts_with("flipped: face winding"));
    }

    #[test]
    fn sliver_triangle_is_a_defect() {
        let mut mesh = TriangleMesh::new();
        let a = mesh.add_vertex([0.0; 3], [0.0, 0.0, 1.0]);
        let b = mesh.add_vertex([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        let c = mesh.add_vertex([2.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        mesh.add_triangle(a, b, c);
        let report = analyze_mesh("sliver", &mesh).unwrap();
        assert_eq!(report.errors, vec![MeshDefect::DegenerateFaces { count: 1 }]);
        assert_eq!(report.issues(), vec!["sliver: 1 degenerate faces (zero area)"]);
    }

    #[test]
    fn bad_index_and_empty_mesh_are_errors() {
        let mut mesh = TriangleMesh::new();
        assert_eq!(
            analyze_mesh("none", &mesh),
            Err(AnalysisError::EmptyMesh {
                name: "none".to_string()
            })
        );
        mesh.add_vertex([0.0; 3], [0.0; 3]);
        mesh.add_triangle(0, 0, 5);
        assert!(matches!(
            analyze_mesh("bad", &mesh),
            Err(AnalysisError::IndexOutOfRange { index: 5, .. })
        ));
    }
}
