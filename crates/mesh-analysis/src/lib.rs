//! Statistics, validation and fit checks for generated tray, box and lid
//! meshes.

pub mod error;
pub mod intersect;
pub mod mesh_report;
pub mod report;
pub mod spatial;

pub use error::AnalysisError;
pub use intersect::{check_intersections, placed_parts, IntersectionIssue, PlacedPart};
pub use mesh_report::{analyze_mesh, MeshDefect, MeshReport, MeshWarning};
pub use report::{analyze_parts, part_labels, AnalysisReport, CombinedAnalysis};
pub use spatial::{spatial_layout, FitCheck, SpatialLayout};
