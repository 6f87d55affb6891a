use layout_engine::{BoxLayout, ErrorKind};
use mesh_analysis::AnalysisReport;
use serde::{Deserialize, Serialize};
use solid_builder::{BuildConfig, PartMesh};
use tray_types::BoxParams;
use uuid::Uuid;

/// Requests from the UI to the engine worker.
/// Serialized as JSON for postMessage transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// Tray placements and box dimensions, without geometry.
    ComputeLayout { box_params: BoxParams },

    GenerateTray {
        box_params: BoxParams,
        tray_id: Uuid,
        #[serde(default)]
        config: Option<BuildConfig>,
    },
    GenerateBox {
        box_params: BoxParams,
        #[serde(default)]
        config: Option<BuildConfig>,
    },
    GenerateLid {
        box_params: BoxParams,
        #[serde(default)]
        config: Option<BuildConfig>,
    },
    /// Every tray, then the box, then the lid.
    GenerateAll {
        box_params: BoxParams,
        #[serde(default)]
        config: Option<BuildConfig>,
    },

    /// Generate all parts and report mesh statistics and the fit check.
    Analyze {
        box_params: BoxParams,
        #[serde(default)]
        config: Option<BuildConfig>,
    },

    /// Remove a tray's custom shape; stacks using it fall back to squares.
    DeleteCustomShape {
        box_params: BoxParams,
        tray_id: Uuid,
        shape_name: String,
    },
}

/// Responses from the engine worker to the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    LayoutComputed { layout: BoxLayout },

    PartsGenerated { parts: Vec<PartMesh> },

    AnalysisReady { report: AnalysisReport },

    /// The updated parameters, with the number of stacks that were migrated.
    ShapeDeleted {
        box_params: BoxParams,
        migrated_stacks: usize,
    },

    Error { message: String, kind: ErrorKind },
}
