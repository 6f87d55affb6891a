use layout_engine::{ErrorKind, LayoutError};
use mesh_analysis::AnalysisError;
use solid_builder::BuildError;
use uuid::Uuid;

/// Errors from the bridge layer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BridgeError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("tray {tray_id} is not part of box '{box_name}'")]
    TrayNotFound { tray_id: Uuid, box_name: String },

    #[error("tray '{tray}' has no custom shape '{shape}'")]
    ShapeNotFound { tray: String, shape: String },

    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

impl BridgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::Layout(e) => e.kind(),
            BridgeError::Build(e) => e.kind(),
            BridgeError::Analysis(_) => ErrorKind::GeometryFailure,
            BridgeError::TrayNotFound { .. }
            | BridgeError::ShapeNotFound { .. }
            | BridgeError::Serialization { .. } => ErrorKind::InvalidInput,
        }
    }
}
