//! Combined analysis report over every generated part of one box.

use chrono::{DateTime, Utc};
use layout_engine::BoxLayout;
use serde::{Deserialize, Serialize};
use solid_builder::{PartKind, PartMesh};
use tracing::{info, instrument};

use crate::error::AnalysisError;
use crate::intersect::{check_intersections, placed_parts, IntersectionIssue};
use crate::mesh_report::{analyze_mesh, MeshReport};
use crate::spatial::{spatial_layout, SpatialLayout};

pub const REPORT_FORMAT: &str = "counter-tray-analysis";
pub const REPORT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedAnalysis {
    pub total_vertices: usize,
    pub total_faces: usize,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub format: String,
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub box_name: String,
    pub meshes: Vec<MeshReport>,
    pub intersections: Vec<IntersectionIssue>,
    pub spatial_layout: SpatialLayout,
    pub combined_analysis: CombinedAnalysis,
}

impl AnalysisReport {
    pub fn is_clean(&self) -> bool {
        self.combined_analysis.issues.is_empty()
    }

    pub fn to_json(&self) -> Result<String, AnalysisError> {
        serde_json::to_string_pretty(self).map_err(|e| AnalysisError::Serialize(e.to_string()))
    }
}

/// Stable part names: `tray_A_Name`, `tray_B_Other`, `box`, `lid`.
pub fn part_labels(parts: &[PartMesh]) -> Vec<String> {
    let mut tray_index = 0u32;
    parts
        .iter()
        .map(|part| match part.kind {
            PartKind::Tray => {
                let letter = char::from_u32(u32::from(b'A') + tray_index)
                    .filter(|c| c.is_ascii_uppercase())
                    .map_or_else(|| (tray_index + 1).to_string(), String::from);
                tray_index += 1;
                format!("tray_{letter}_{}", part.name.replace(' ', "_"))
            }
            PartKind::Box => "box".to_string(),
            PartKind::Lid => "lid".to_string(),
        })
        .collect()
}

/// Analyze every part, check tray placement and the box fit, and gather
/// everything worth attention into one issue list.
#[instrument(skip_all, fields(name = %layout.name, parts = parts.len()))]
pub fn analyze_parts(layout: &BoxLayout, parts: &[PartMesh]) -> Result<AnalysisReport, AnalysisError> {
    if !parts.iter().any(|p| p.kind == PartKind::Box) {
        return Err(AnalysisError::MissingPart {
            part: "box".to_string(),
        });
    }

    let meshes = parts
        .iter()
        .zip(part_labels(parts))
        .map(|(part, label)| analyze_mesh(&label, &part.mesh))
        .collect::<Result<Vec<_>, _>>()?;
    let intersections = check_intersections(&placed_parts(layout, parts));
    let spatial = spatial_layout(layout, parts);

    let mut issues: Vec<String> = meshes.iter().flat_map(MeshReport::issues).collect();
    issues.extend(intersections.iter().map(ToString::to_string));
    if let Some(fit) = &spatial.fit_check {
        issues.extend(fit.issues());
    }
    info!(issues = issues.len(), "analysis complete");

    Ok(AnalysisReport {
        format: REPORT_FORMAT.to_string(),
        version: REPORT_VERSION,
        generated_at: Utc::now(),
        box_name: layout.name.clone(),
        combined_analysis: CombinedAnalysis {
            total_vertices: meshes.iter().map(|m| m.stats.vertices).sum(),
            total_faces: meshes.iter().map(|m| m.stats.faces).sum(),
            issues,
        },
        meshes,
        intersections,
        spatial_layout: spatial,
    })
}
