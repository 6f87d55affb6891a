//! Part generation: layout, build and tessellate in one call.

use csg_kernel::{Kernel, SolidHandle, TriangleMesh};
use layout_engine::{compute_box_layout, subject_name, BoxLayout};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use tray_types::BoxParams;
use uuid::Uuid;

use crate::box_builder::build_box;
use crate::config::BuildConfig;
use crate::error::BuildError;
use crate::lid::build_lid;
use crate::tray::build_tray;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PartKind {
    Tray,
    Box,
    Lid,
}

/// One tessellated part, in its own build frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartMesh {
    pub kind: PartKind,
    /// Tray id for trays, box id for the box and lid.
    pub id: Uuid,
    pub name: String,
    pub mesh: TriangleMesh,
}

/// Layout that is safe to build from: custom dimensions that cannot hold
/// the trays are rejected here.
pub fn buildable_layout(params: &BoxParams) -> Result<BoxLayout, BuildError> {
    let layout = compute_box_layout(params)?;
    layout
        .dimensions
        .check(&subject_name("box", &params.name))?;
    Ok(layout)
}

fn finish(
    kernel: &mut dyn Kernel,
    solid: SolidHandle,
    kind: PartKind,
    id: Uuid,
    name: &str,
) -> Result<PartMesh, BuildError> {
    let mesh = kernel.tessellate(solid);
    kernel.release(solid);
    let mesh = mesh?;
    info!(?kind, name, triangles = mesh.triangle_count(), "part generated");
    Ok(PartMesh {
        kind,
        id,
        name: name.to_string(),
        mesh,
    })
}

fn tray_part(
    kernel: &mut dyn Kernel,
    layout: &BoxLayout,
    params: &BoxParams,
    tray_id: Uuid,
    config: &BuildConfig,
) -> Result<PartMesh, BuildError> {
    let missing = || BuildError::TrayNotFound {
        tray_id,
        box_name: params.name.clone(),
    };
    let tray = params.tray(tray_id).ok_or_else(missing)?;
    let tray_layout = layout.tray(tray_id).ok_or_else(missing)?;
    let solid = build_tray(kernel, tray_layout, &tray.params, config)?;
    finish(kernel, solid, PartKind::Tray, tray_id, &tray.name)
}

#[instrument(skip_all, fields(tray = %tray_id))]
pub fn generate_tray(
    kernel: &mut dyn Kernel,
    params: &BoxParams,
    tray_id: Uuid,
    config: &BuildConfig,
) -> Result<PartMesh, BuildError> {
    let layout = buildable_layout(params)?;
    tray_part(kernel, &layout, params, tray_id, config)
}

#[instrument(skip_all, fields(name = %params.name))]
pub fn generate_box(
    kernel: &mut dyn Kernel,
    params: &BoxParams,
    config: &BuildConfig,
) -> Result<PartMesh, BuildError> {
    let layout = buildable_layout(params)?;
    let solid = build_box(kernel, &layout, params, config)?;
    finish(kernel, solid, PartKind::Box, params.id, &params.name)
}

#[instrument(skip_all, fields(name = %params.name))]
pub fn generate_lid(
    kernel: &mut dyn Kernel,
    params: &BoxParams,
    config: &BuildConfig,
) -> Result<PartMesh, BuildError> {
    let layout = buildable_layout(params)?;
    let solid = build_lid(kernel, &layout, params, config)?;
    finish(kernel, solid, PartKind::Lid, params.id, &params.name)
}

/// Every tray in box order, then the box, then the lid.
#[instrument(skip_all, fields(name = %params.name))]
pub fn generate_all(
    kernel: &mut dyn Kernel,
    params: &BoxParams,
    config: &BuildConfig,
) -> Result<Vec<PartMesh>, BuildError> {
    let layout = buildable_layout(params)?;
    let mut parts = Vec::with_capacity(params.trays.len() + 2);
    for tray in &params.trays {
        parts.push(tray_part(kernel, &layout, params, tray.id, config)?);
    }
    let solid = build_box(kernel, &layout, params, config)?;
    parts.push(finish(kernel, solid, PartKind::Box, params.id, &params.name)?);
    let solid = build_lid(kernel, &layout, params, config)?;
    parts.push(finish(kernel, solid, PartKind::Lid, params.id, &params.name)?);
    Ok(parts)
}
