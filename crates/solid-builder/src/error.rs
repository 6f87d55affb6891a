use csg_kernel::KernelError;
use layout_engine::{ErrorKind, LayoutError};
use thiserror::Error;
use uuid::Uuid;

/// Errors from building tray, box and lid solids.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// The parameters were rejected before any geometry was built.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// A kernel operation failed or produced degenerate geometry.
    #[error("geometry failure: {0}")]
    Kernel(#[from] KernelError),

    #[error("tray {tray_id} is not part of box '{box_name}'")]
    TrayNotFound { tray_id: Uuid, box_name: String },

    #[error("invalid build configuration: {reason}")]
    Config { reason: String },
}

impl BuildError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::Layout(e) => e.kind(),
            BuildError::Kernel(_) => ErrorKind::GeometryFailure,
            BuildError::TrayNotFound { .. } | BuildError::Config { .. } => ErrorKind::InvalidInput,
        }
    }
}
