//! Collision checks between placed trays and the box.

use std::fmt;

use csg_kernel::Aabb;
use layout_engine::BoxLayout;
use serde::{Deserialize, Serialize};
use solid_builder::{PartKind, PartMesh};

use crate::report::part_labels;

/// Parts closer than this are touching, not colliding.
pub const TOUCH_TOLERANCE: f64 = 0.5;

const AXES: [char; 3] = ['X', 'Y', 'Z'];

/// A part's bounds in the box frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPart {
    pub name: String,
    pub kind: PartKind,
    pub bounds: Aabb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Min,
    Max,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IntersectionIssue {
    Collision { first: String, second: String },
    OutsideBox { tray: String, axis: char, side: Side },
}

impl fmt::Display for IntersectionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntersectionIssue::Collision { first, second } => {
                write!(f, "collision: {first} and {second} overlap")
            }
            IntersectionIssue::OutsideBox { tray, axis, side } => {
                let side = match side {
                    Side::Min => "min",
                    Side::Max => "max",
                };
                write!(f, "{tray} extends outside box on {axis} {side}")
            }
        }
    }
}

/// Trays moved to their box positions, plus the box itself. The lid is
/// generated in print orientation and has no box-frame position.
pub fn placed_parts(layout: &BoxLayout, parts: &[PartMesh]) -> Vec<PlacedPart> {
    parts
        .iter()
        .zip(part_labels(parts))
        .filter_map(|(part, name)| {
            let bounds = part.mesh.bounding_box()?;
            let bounds = match part.kind {
                PartKind::Tray => bounds.translated(layout.tray_origin(part.id)?),
                PartKind::Box => bounds,
                PartKind::Lid => return None,
            };
            Some(PlacedPart {
                name,
                kind: part.kind,
                bounds,
            })
        })
        .collect()
}

/// Tray pairs whose bounds overlap and trays that poke out of the box.
pub fn check_intersections(parts: &[PlacedPart]) -> Vec<IntersectionIssue> {
    let trays: Vec<&PlacedPart> = parts.iter().filter(|p| p.kind == PartKind::Tray).collect();
    let mut issues = Vec::new();
    for (i, a) in trays.iter().enumerate() {
        for b in &trays[i + 1..] {
            if a.bounds.overlaps(&b.bounds, TOUCH_TOLERANCE) {
                issues.push(IntersectionIssue::Collision {
                    first: a.name.clone(),
                    second: b.name.clone(),
                });
            }
        }
    }

    if let Some(shell) = parts.iter().find(|p| p.kind == PartKind::Box) {
        for tray in &trays {
            for (axis, name) in AXES.iter().enumerate() {
                if tray.bounds.min[axis] < shell.bounds.min[axis] - TOUCH_TOLERANCE {
                    issues.push(IntersectionIssue::OutsideBox {
                        tray: tray.name.clone(),
                        axis: *name,
                        side: Side::Min,
                    });
                }
                if tray.bounds.max[axis] > shell.bounds.max[axis] + TOUCH_TOLERANCE {
                    issues.push(IntersectionIssue::OutsideBox {
                        tray: tray.name.clone(),
                        axis: *name,
                        side: Side::Max,
                    });
                }
            }
        }
    }
    issues
}
